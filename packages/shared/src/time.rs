use chrono::{DateTime, Utc};

/// Get current Unix timestamp (milliseconds)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as RFC 3339 in UTC.
///
/// Out-of-range values fall back to the epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        // テスト項目: ミリ秒のタイムスタンプを RFC 3339 形式に変換できる
        // given (前提条件):
        let millis = 1_672_498_800_000;

        // when (操作):
        let formatted = timestamp_to_rfc3339(millis);

        // then (期待する結果):
        assert_eq!(formatted, "2022-12-31T15:00:00+00:00");
    }

    #[test]
    fn test_get_unix_timestamp_millis_is_recent() {
        // テスト項目: 現在時刻が 2020 年以降のミリ秒で返される
        // when (操作):
        let now = get_unix_timestamp_millis();

        // then (期待する結果):
        assert!(now > 1_577_836_800_000);
    }
}
