use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

#[derive(Queryable, Selectable)]
#[diesel(table_name = super::schema::appointments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appointment {
    pub id: i32,
    pub owner: String,
    pub location: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl Appointment {
    pub fn describe(&self) -> String {
        format!(
            "Location: {}, Date: {}, Time: {}",
            self.location, self.appointment_date, self.appointment_time
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = super::schema::appointments)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAppointment {
    pub owner: String,
    pub location: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl NewAppointment {
    pub fn new(owner: String, location: String, date: NaiveDate, time: NaiveTime) -> NewAppointment {
        NewAppointment {
            owner,
            location,
            appointment_date: date.format("%Y-%m-%d").to_string(),
            appointment_time: time.format("%H:%M:%S").to_string(),
        }
    }
}
