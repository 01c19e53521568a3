pub const SESSIONS_TABLE_NAME: &str = "sessions";
pub const SESSION_ID: &str = "session_id";
pub const SESSION_TYPE: &str = "session_type";
pub const SESSION_DESCRIPTION: &str = "session_description";

// Per session measurement tables, see `table_name`
pub const MEASUREMENT_TABLE_PREFIX: &str = "data_";
pub const ID: &str = "id";
pub const TIMESTAMP: &str = "timestamp";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const HEARTRATE: &str = "heartrate";

/// Name of the measurement table holding the data of session `id`.
pub fn table_name(id: i64) -> String {
    if id < 0 {
        format!("{}n{}", MEASUREMENT_TABLE_PREFIX, id.unsigned_abs())
    } else {
        format!("{}{}", MEASUREMENT_TABLE_PREFIX, id)
    }
}

#[test]
fn table_names() {
    assert_eq!(table_name(0), "data_0");
    assert_eq!(table_name(412), "data_412");
    assert_eq!(table_name(-3), "data_n3");
}
