use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::booking::{BookingDraft, BookingStep, ASK_LOCATION};
use super::model::{Speaker, Turn};

/// Turns of model conversation kept per session.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Session {
    booking: Option<BookingDraft>,
    history: Vec<Turn>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Session {
        Session {
            booking: None,
            history: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Per-browser conversation state. Guards are never held across an await.
///
/// An entry exists only while a session has a booking in progress or model
/// history; idle entries are swept whenever a new session is stored.
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> SessionStore {
        SessionStore {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_booking(&self, id: Uuid) -> bool {
        self.sessions
            .get(&id)
            .map_or(false, |session| session.booking.is_some())
    }

    /// Moves a booking in progress forward, or starts one when
    /// `start_booking` is set. `None` means no booking is involved.
    pub fn advance_booking(&self, id: Uuid, input: &str, start_booking: bool) -> Option<BookingStep> {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_seen = Instant::now();
            if let Some(draft) = session.booking.as_mut() {
                return Some(draft.advance(input));
            }
            if start_booking {
                session.booking = Some(BookingDraft::default());
                return Some(BookingStep::Reply(ASK_LOCATION));
            }
            return None;
        }

        if !start_booking {
            return None;
        }
        let mut session = Session::new();
        session.booking = Some(BookingDraft::default());
        self.insert(id, session);
        Some(BookingStep::Reply(ASK_LOCATION))
    }

    pub fn clear_booking(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.booking = None;
            session.last_seen = Instant::now();
        }
    }

    pub fn history(&self, id: Uuid) -> Vec<Turn> {
        self.sessions
            .get(&id)
            .map(|session| session.history.clone())
            .unwrap_or_default()
    }

    pub fn record_exchange(&self, id: Uuid, input: &str, reply: &str) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_seen = Instant::now();
            push_exchange(&mut session.history, input, reply);
            return;
        }

        let mut session = Session::new();
        push_exchange(&mut session.history, input, reply);
        self.insert(id, session);
    }

    /// Drops sessions idle for longer than the timeout, as of `now`.
    pub fn sweep_idle_at(&self, now: Instant) {
        let idle_timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) <= idle_timeout);
    }

    fn insert(&self, id: Uuid, session: Session) {
        self.sweep_idle_at(Instant::now());
        self.sessions.insert(id, session);
    }
}

fn push_exchange(history: &mut Vec<Turn>, input: &str, reply: &str) {
    history.push(Turn::new(Speaker::User, input));
    history.push(Turn::new(Speaker::Assistant, reply));
    if history.len() > MAX_HISTORY_TURNS {
        let excess = history.len() - MAX_HISTORY_TURNS;
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_core::booking::ASK_DATE;

    #[test]
    fn test_booking_starts_only_when_asked() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        assert_eq!(store.advance_booking(id, "hello", false), None);
        assert!(!store.is_booking(id));

        assert_eq!(
            store.advance_booking(id, "book appointment", true),
            Some(BookingStep::Reply(ASK_LOCATION))
        );
        assert!(store.is_booking(id));
        assert_eq!(
            store.advance_booking(id, "City clinic", false),
            Some(BookingStep::Reply(ASK_DATE))
        );

        store.clear_booking(id);
        assert!(!store.is_booking(id));
    }

    #[test]
    fn test_plain_messages_store_nothing() {
        let store = SessionStore::new();
        for _ in 0..1000 {
            assert_eq!(store.advance_booking(Uuid::new_v4(), "hello", false), None);
        }
        assert!(store.is_empty());
        assert!(store.history(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_idle_sessions_are_swept() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let (booking, chatting) = (Uuid::new_v4(), Uuid::new_v4());
        store.advance_booking(booking, "book appointment", true);
        store.record_exchange(chatting, "hi", "hello");
        assert_eq!(store.len(), 2);

        store.sweep_idle_at(Instant::now());
        assert_eq!(store.len(), 2);

        store.sweep_idle_at(Instant::now() + Duration::from_secs(120));
        assert!(store.is_empty());
        assert!(!store.is_booking(booking));
    }

    #[test]
    fn test_new_session_sweeps_stale_ones() {
        let store = SessionStore::with_idle_timeout(Duration::ZERO);
        let stale = Uuid::new_v4();
        store.record_exchange(stale, "hi", "hello");
        std::thread::sleep(Duration::from_millis(5));

        store.record_exchange(Uuid::new_v4(), "hi", "hello");
        assert_eq!(store.len(), 1);
        assert!(store.history(stale).is_empty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        store.advance_booking(a, "book appointment", true);
        assert!(store.is_booking(a));
        assert!(!store.is_booking(b));

        store.record_exchange(b, "hi", "hello");
        assert!(store.history(a).is_empty());
        assert_eq!(store.history(b).len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        for i in 0..MAX_HISTORY_TURNS {
            store.record_exchange(id, &format!("q{i}"), &format!("a{i}"));
        }

        let history = store.history(id);
        assert_eq!(history.len(), MAX_HISTORY_TURNS);
        assert_eq!(history.last(), Some(&Turn::new(Speaker::Assistant, format!("a{}", MAX_HISTORY_TURNS - 1))));
        assert_eq!(history[0].speaker, Speaker::User);
    }
}
