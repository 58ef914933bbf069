use chrono::{NaiveDate, NaiveTime};

pub const ASK_LOCATION: &str = "Sure! Where would you like to book the appointment?";
pub const ASK_DATE: &str = "Got it! What date would you like the appointment?";
pub const ASK_TIME: &str = "Great! What time would you prefer?";
pub const INVALID_DATE: &str = "Please enter a valid date in DD-MM-YYYY format.";
pub const INVALID_TIME: &str = "Please enter a valid time in HH:MM format.";

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%H:%M";

/// An appointment being collected one answer at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingDraft {
    location: Option<String>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedBooking {
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingStep {
    /// Ask the user something and wait for the next answer.
    Reply(&'static str),
    /// Every field is known; the booking can be stored.
    Ready(ConfirmedBooking),
}

impl BookingDraft {
    /// Feeds one user answer into the first missing field.
    ///
    /// Once complete, every further call yields `Ready` again so a failed
    /// insert can be retried.
    pub fn advance(&mut self, input: &str) -> BookingStep {
        let location = match &self.location {
            Some(location) => location.clone(),
            None => {
                self.location = Some(input.to_string());
                return BookingStep::Reply(ASK_DATE);
            }
        };

        let date = match self.date {
            Some(date) => date,
            None => {
                return match NaiveDate::parse_from_str(input.trim(), DATE_FORMAT) {
                    Ok(date) => {
                        self.date = Some(date);
                        BookingStep::Reply(ASK_TIME)
                    }
                    Err(_) => BookingStep::Reply(INVALID_DATE),
                }
            }
        };

        let time = match self.time {
            Some(time) => time,
            None => match NaiveTime::parse_from_str(input.trim(), TIME_FORMAT) {
                Ok(time) => {
                    self.time = Some(time);
                    time
                }
                Err(_) => return BookingStep::Reply(INVALID_TIME),
            },
        };

        BookingStep::Ready(ConfirmedBooking {
            location,
            date,
            time,
        })
    }
}
