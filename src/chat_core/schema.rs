diesel::table! {
    appointments (id) {
        id -> Integer,
        owner -> Text,
        location -> Text,
        appointment_date -> Text,
        appointment_time -> Text,
    }
}
