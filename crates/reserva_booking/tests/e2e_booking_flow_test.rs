//! Walks a customer through the booking wizard against the in-memory calendar,
//! including a slot stolen between display and submission.

use chrono::{Duration, NaiveDate, Utc};
use reserva_booking::flow::{BookingFlow, BookingStep, CommitSignal};
use reserva_booking::{AvailabilityResolver, ReservationCoordinator};

mod fixtures;
use fixtures::{busy, create_test_state, monday_at, CALENDAR_ID, MONDAY};

#[tokio::test]
async fn test_e2e_booking_flow() {
    let (state, calendar) = create_test_state();
    let date = NaiveDate::parse_from_str(MONDAY, "%Y-%m-%d").unwrap();
    let resolver =
        AvailabilityResolver::new(state.calendar.as_ref(), CALENDAR_ID, &state.settings);
    let coordinator =
        ReservationCoordinator::new(state.calendar.as_ref(), CALENDAR_ID, &state.settings);

    // Step 1: pick a service
    let service = state.catalog.get("gel-manicure").unwrap().clone();
    let flow = BookingFlow::new()
        .update_form(|form| {
            form.service_id = Some(service.id.clone());
            form.service_title = Some(service.title.clone());
            form.duration_minutes = Some(service.duration_minutes);
        })
        .next_step();
    assert_eq!(flow.step(), BookingStep::DateTime);

    // Step 2: pick the first free slot
    let day = resolver
        .resolve(date, Duration::minutes(service.duration_minutes), Utc::now())
        .await
        .unwrap();
    let first_free = day.slots.iter().find(|s| s.available).unwrap().slot;
    assert_eq!(first_free.start_utc(), monday_at(9, 0));

    let flow = flow
        .update_form(|form| {
            form.date = Some(date);
            form.slot = Some(first_free.start.fixed_offset());
        })
        .next_step()
        .update_form(|form| form.email = Some("ana@example.com".to_string()))
        .next_step()
        .update_form(|form| {
            form.phone = Some("+34 600 000 000".to_string());
            form.first_name = Some("Ana".to_string());
            form.last_name = Some("Ruiz".to_string());
        });
    assert_eq!(flow.step(), BookingStep::Details);

    // Step 3: someone else takes 09:30 before we submit
    calendar.add_busy(CALENDAR_ID, busy(monday_at(9, 30), 30));

    let (flow, ticket) = flow.begin_submission();
    let result = coordinator
        .submit(&flow.form().to_submission(), &state.catalog, Utc::now())
        .await;
    let flow = flow.apply_signal(ticket.unwrap(), CommitSignal::from(result));

    assert_eq!(flow.step(), BookingStep::DateTime);
    assert!(flow.form().slot.is_none());
    assert!(flow.error().is_some());
    assert_eq!(calendar.event_count(CALENDAR_ID), 0);

    // Step 4: the refreshed availability no longer offers it; take the next free one
    let day = resolver
        .resolve(date, Duration::minutes(service.duration_minutes), Utc::now())
        .await
        .unwrap();
    let nine = day
        .slots
        .iter()
        .find(|s| s.slot.start_utc() == monday_at(9, 0))
        .unwrap();
    assert!(!nine.available);
    let next_free = day.slots.iter().find(|s| s.available).unwrap().slot;
    assert_eq!(next_free.start_utc(), monday_at(10, 0));

    let flow = flow
        .update_form(|form| {
            form.date = Some(date);
            form.slot = Some(next_free.start.fixed_offset());
        })
        .go_to_step(BookingStep::Details);

    let (flow, ticket) = flow.begin_submission();
    let result = coordinator
        .submit(&flow.form().to_submission(), &state.catalog, Utc::now())
        .await;
    let flow = flow.apply_signal(ticket.unwrap(), CommitSignal::from(result));

    // Step 5: confirmed, with everything entered kept
    assert_eq!(flow.step(), BookingStep::Confirmation);
    let confirmation = flow.confirmation().unwrap();
    assert_eq!(confirmation.start.with_timezone(&Utc), monday_at(10, 0));
    assert_eq!(confirmation.customer_name, "Ana Ruiz");
    assert_eq!(flow.form().email.as_deref(), Some("ana@example.com"));

    let events = calendar.events(CALENDAR_ID);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, confirmation.event_id);

    // Step 6: the booked hour now shows as occupied
    let day = resolver
        .resolve(date, Duration::minutes(30), Utc::now())
        .await
        .unwrap();
    let occupied: Vec<String> = day
        .slots
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.slot.start.format("%H:%M").to_string())
        .collect();
    assert_eq!(occupied, vec!["09:30", "10:00", "10:30"]);
}
