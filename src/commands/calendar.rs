use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use colored::Colorize;

use crate::models::HistoryRecord;

/// First and last day of a month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Groups records by day of month, keeping only those inside the month.
pub fn sessions_by_day(
    records: &[HistoryRecord],
    first: NaiveDate,
    last: NaiveDate,
) -> BTreeMap<u32, Vec<&HistoryRecord>> {
    let mut map: BTreeMap<u32, Vec<&HistoryRecord>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.date >= first && r.date <= last) {
        map.entry(r.date.day()).or_default().push(r);
    }
    map
}

pub fn show(records: &[HistoryRecord], year: Option<i32>, month: Option<u32>) -> Result<()> {
    let now = Local::now();
    let year = year.unwrap_or(now.year());
    let month = month.unwrap_or(now.month());

    let Some((first_day, last_day)) = month_bounds(year, month) else {
        println!("{} month must be between 1 and 12", "error:".red().bold());
        return Ok(());
    };

    let by_day = sessions_by_day(records, first_day, last_day);

    println!("\n{}", first_day.format("%B %Y").to_string().bold().cyan());
    println!("{}", "Su Mo Tu We Th Fr Sa".dimmed());

    // 0 = Sunday
    let first_weekday = first_day.weekday().num_days_from_sunday() as usize;
    print!("{}", "   ".repeat(first_weekday));

    for day in 1..=last_day.day() {
        if by_day.contains_key(&day) {
            print!("{} ", format!("{:2}", day).green().bold());
        } else {
            print!("{:2} ", day);
        }

        if (first_weekday + day as usize) % 7 == 0 {
            println!();
        }
    }
    println!("\n");

    if !by_day.is_empty() {
        println!("{}", "Sessions:".bold().cyan());
        for r in by_day.values().flatten() {
            let start = r.start_time.with_timezone(&Local);
            let status = if r.is_unfinished() {
                "in progress".yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "  {} | {} {}",
                start.format("%a %b %d %H:%M").to_string().green(),
                r.day.name.bold(),
                status
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::{Day, ProgramId};

    #[test]
    fn bounds_handle_december_and_leap_years() {
        let (first, last) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(month_bounds(2024, 2).unwrap().1.day(), 29);
        assert!(month_bounds(2024, 13).is_none());
        assert!(month_bounds(2024, 0).is_none());
    }

    #[test]
    fn groups_only_sessions_in_month() {
        let rec = |d: u32, m: u32| {
            HistoryRecord::start(
                ProgramId(1),
                0,
                Day::new("A"),
                Utc.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap(),
            )
        };
        let records = vec![rec(3, 5), rec(3, 5), rec(20, 5), rec(3, 6)];
        let (first, last) = month_bounds(2024, 5).unwrap();

        let map = sessions_by_day(&records, first, last);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 20]);
        assert_eq!(map[&3].len(), 2);
    }
}
