// --- File: crates/services/reserva_backend/src/lib.rs ---
pub mod service_factory;
