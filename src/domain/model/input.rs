//! 入力境界での正規化。Presentation層が受け取った生の値をBookの型に変換する。

use crate::domain::error::DomainError;

/// 年の許容範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1000,
            max: 2100,
        }
    }
}

impl YearRange {
    pub fn check(&self, year: i64) -> Result<i32, DomainError> {
        if year < i64::from(self.min) || year > i64::from(self.max) {
            return Err(DomainError::YearOutOfRange {
                year,
                min: self.min,
                max: self.max,
            });
        }
        // min..=max は i32 に収まる
        i32::try_from(year).map_err(|_| DomainError::InvalidYear(year.to_string()))
    }
}

/// テキストの年を整数に変換する。前後の空白は無視。
pub fn parse_year(raw: &str) -> Result<i64, DomainError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidYear(raw.to_string()))
}

/// "yes"（大文字小文字無視、空白は許容しない）のみ既読。それ以外は未読。
pub fn parse_read_status(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_accepts_integers() {
        assert_eq!(parse_year("1965").unwrap(), 1965);
        assert_eq!(parse_year(" 2001 ").unwrap(), 2001);
        assert_eq!(parse_year("-44").unwrap(), -44);
    }

    #[test]
    fn parse_year_rejects_non_integers() {
        assert!(matches!(parse_year("nineteen"), Err(DomainError::InvalidYear(_))));
        assert!(matches!(parse_year("1965.5"), Err(DomainError::InvalidYear(_))));
        assert!(matches!(parse_year(""), Err(DomainError::InvalidYear(_))));
    }

    #[test]
    fn year_range_bounds_inclusive() {
        let range = YearRange::default();
        assert_eq!(range.check(1000).unwrap(), 1000);
        assert_eq!(range.check(2100).unwrap(), 2100);
        assert!(matches!(
            range.check(999),
            Err(DomainError::YearOutOfRange { year: 999, .. })
        ));
        assert!(range.check(2101).is_err());
        assert!(range.check(i64::MAX).is_err());
    }

    #[test]
    fn read_status_yes_only() {
        assert!(parse_read_status("yes"));
        assert!(parse_read_status("YES"));
        assert!(parse_read_status("Yes"));
        assert!(!parse_read_status("no"));
        assert!(!parse_read_status("y"));
        assert!(!parse_read_status(" yes"));
        assert!(!parse_read_status("yes\n"));
        assert!(!parse_read_status(""));
    }
}
