use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::booking::{BookingStep, ConfirmedBooking};
use super::model::LanguageModel;
use super::sessions::SessionStore;
use super::store::AppointmentStore;
use super::types::NewAppointment;

pub const BOOKING_CANCELED: &str = "The booking process has been canceled.";
pub const BOOKING_DONE: &str = "✅ Your appointment has been booked successfully!";
const NO_APPOINTMENTS: &str = "You have no upcoming appointments.";

/// Answers chat input for the clinic: booking commands first, the language
/// model for everything else.
pub struct Assistant {
    model: Arc<dyn LanguageModel>,
    store: AppointmentStore,
    sessions: SessionStore,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>, store: AppointmentStore) -> Assistant {
        Assistant {
            model,
            store,
            sessions: SessionStore::new(),
        }
    }

    pub async fn respond(&self, session: Uuid, input: &str) -> Result<String> {
        debug!(%session, booking = self.sessions.is_booking(session), "handling chat input");
        let lowered = input.to_lowercase();

        if mentions(&lowered, &["cancel", "booking"]) {
            return Ok(self.cancel_booking(session).to_string());
        }

        if mentions(&lowered, &["show", "bookings"]) {
            let listing = self.list_bookings(session).await;
            return Ok(format!("Here are your upcoming appointments:\n{listing}"));
        }

        let start_booking = mentions(&lowered, &["book", "appointment"]);
        match self.sessions.advance_booking(session, input, start_booking) {
            Some(BookingStep::Reply(text)) => Ok(text.to_string()),
            Some(BookingStep::Ready(booking)) => Ok(self.book(session, booking).await),
            None => self.converse(session, input).await,
        }
    }

    pub fn cancel_booking(&self, session: Uuid) -> &'static str {
        self.sessions.clear_booking(session);
        BOOKING_CANCELED
    }

    async fn list_bookings(&self, session: Uuid) -> String {
        match self.store.list_for(&session.to_string()).await {
            Ok(appointments) if appointments.is_empty() => NO_APPOINTMENTS.to_string(),
            Ok(appointments) => appointments
                .iter()
                .map(|appointment| appointment.describe())
                .collect::<Vec<_>>()
                .join("\n"),
            Err(err) => {
                warn!(%session, "Failed to fetch appointments: {err:#}");
                format!("Error fetching appointments: {err}")
            }
        }
    }

    /// Stores a complete booking. On failure the booking stays in progress,
    /// so the next message retries.
    async fn book(&self, session: Uuid, booking: ConfirmedBooking) -> String {
        let appointment =
            NewAppointment::new(session.to_string(), booking.location, booking.date, booking.time);
        match self.store.book(appointment).await {
            Ok(()) => {
                self.sessions.clear_booking(session);
                info!(%session, "appointment booked");
                BOOKING_DONE.to_string()
            }
            Err(err) => {
                warn!(%session, "Failed to book appointment: {err:#}");
                format!("❌ Failed to book appointment: {err}")
            }
        }
    }

    async fn converse(&self, session: Uuid, input: &str) -> Result<String> {
        let history = self.sessions.history(session);
        let reply = self.model.reply(&history, input).await?;
        self.sessions.record_exchange(session, input, &reply);
        Ok(reply)
    }
}

fn mentions(lowered: &str, words: &[&str]) -> bool {
    words.iter().all(|word| lowered.contains(word))
}

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::bail;
    use async_trait::async_trait;

    use super::*;
    use crate::chat_core::booking::{ASK_DATE, ASK_LOCATION, ASK_TIME, INVALID_DATE, INVALID_TIME};
    use crate::chat_core::model::Turn;

    /// Echoes its input along with how much history it was given.
    pub(crate) struct ScriptedModel;

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn reply(&self, history: &[Turn], input: &str) -> Result<String> {
            if input == "fail" {
                bail!("model unavailable");
            }
            Ok(format!("echo({}): {input}", history.len()))
        }
    }

    pub(crate) fn assistant() -> (Assistant, AppointmentStore) {
        let store = AppointmentStore::in_memory().unwrap();
        (Assistant::new(Arc::new(ScriptedModel), store.clone()), store)
    }

    #[tokio::test]
    async fn test_full_booking_conversation() {
        let (assistant, _) = assistant();
        let me = Uuid::new_v4();

        let mut say = Vec::new();
        for input in [
            "I'd like to Book an Appointment",
            "City clinic",
            "tomorrow",
            "14-03-2025",
            "9am",
            "09:30",
        ] {
            say.push(assistant.respond(me, input).await.unwrap());
        }
        assert_eq!(
            say,
            [ASK_LOCATION, ASK_DATE, INVALID_DATE, ASK_TIME, INVALID_TIME, BOOKING_DONE]
        );

        let listing = assistant.respond(me, "show my bookings").await.unwrap();
        assert_eq!(
            listing,
            "Here are your upcoming appointments:\nLocation: City clinic, Date: 2025-03-14, Time: 09:30:00"
        );

        // booking finished, so ordinary chat goes to the model again
        assert_eq!(assistant.respond(me, "thanks").await.unwrap(), "echo(0): thanks");
    }

    #[tokio::test]
    async fn test_show_bookings_when_empty() {
        let (assistant, _) = assistant();
        let reply = assistant.respond(Uuid::new_v4(), "Show bookings").await.unwrap();
        assert_eq!(reply, format!("Here are your upcoming appointments:\n{NO_APPOINTMENTS}"));
    }

    #[tokio::test]
    async fn test_bookings_are_per_session() {
        let (assistant, _) = assistant();
        let (me, other) = (Uuid::new_v4(), Uuid::new_v4());
        for input in ["book appointment", "North", "01-02-2026", "08:15"] {
            assistant.respond(me, input).await.unwrap();
        }

        let mine = assistant.respond(me, "show bookings").await.unwrap();
        assert!(mine.contains("Location: North"));
        let theirs = assistant.respond(other, "show bookings").await.unwrap();
        assert!(theirs.ends_with(NO_APPOINTMENTS));
    }

    #[tokio::test]
    async fn test_cancel_mid_booking() {
        let (assistant, _) = assistant();
        let me = Uuid::new_v4();
        assistant.respond(me, "book appointment").await.unwrap();
        assistant.respond(me, "City clinic").await.unwrap();

        let reply = assistant.respond(me, "please CANCEL the booking").await.unwrap();
        assert_eq!(reply, BOOKING_CANCELED);
        assert_eq!(assistant.respond(me, "14-03-2025").await.unwrap(), "echo(0): 14-03-2025");
    }

    #[tokio::test]
    async fn test_model_sees_history() {
        let (assistant, _) = assistant();
        let me = Uuid::new_v4();
        assert_eq!(assistant.respond(me, "hello").await.unwrap(), "echo(0): hello");
        assert_eq!(assistant.respond(me, "again").await.unwrap(), "echo(2): again");
        assert_eq!(
            assistant.respond(Uuid::new_v4(), "fresh").await.unwrap(),
            "echo(0): fresh"
        );
    }

    #[tokio::test]
    async fn test_model_failure_is_an_error() {
        let (assistant, _) = assistant();
        let me = Uuid::new_v4();
        assert!(assistant.respond(me, "fail").await.is_err());
        // failed exchanges are not remembered
        assert_eq!(assistant.respond(me, "hello").await.unwrap(), "echo(0): hello");
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported_in_reply() {
        let (assistant, store) = assistant();
        store.execute_raw("ALTER TABLE appointments RENAME TO parked").unwrap();

        let reply = assistant.respond(Uuid::new_v4(), "show bookings").await.unwrap();
        assert!(
            reply.starts_with("Here are your upcoming appointments:\nError fetching appointments:"),
            "{reply}"
        );
    }

    #[tokio::test]
    async fn test_failed_insert_is_retried() {
        let (assistant, store) = assistant();
        let me = Uuid::new_v4();
        for input in ["book appointment", "North", "01-02-2026"] {
            assistant.respond(me, input).await.unwrap();
        }

        store.execute_raw("ALTER TABLE appointments RENAME TO parked").unwrap();
        let reply = assistant.respond(me, "08:15").await.unwrap();
        assert!(reply.starts_with("❌ Failed to book appointment:"), "{reply}");

        store.execute_raw("ALTER TABLE parked RENAME TO appointments").unwrap();
        assert_eq!(assistant.respond(me, "anything").await.unwrap(), BOOKING_DONE);
        let listing = assistant.respond(me, "show bookings").await.unwrap();
        assert!(listing.contains("Time: 08:15:00"), "{listing}");
    }
}
