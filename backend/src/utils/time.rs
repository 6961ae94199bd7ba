use chrono::Utc;

/// Current time as unix seconds, the unit of every `exp` claim.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_timestamp_is_close_to_utc_now() {
        let diff = (now_timestamp() - Utc::now().timestamp()).abs();
        assert!(diff < 2, "Difference should be less than 2 seconds");
    }
}
