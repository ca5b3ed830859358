use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use super::types::{Task, TaskKind};

#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub task_id: String,
    pub title: String,
    pub time: Option<String>,
    pub kind: TaskKind,
}

#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

impl CalendarDay {
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }
}

/// A month grid of full Monday-to-Sunday weeks.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    pub title: String,
    pub weeks: Vec<Vec<CalendarDay>>,
    pub prev_month: String,
    pub next_month: String,
}

pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Years the calendar will lay out. Anything else in a `month` link is ignored.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Parse a `YYYY-MM` query value into the first day of that month.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .ok()
        .filter(|d| YEAR_RANGE.contains(&d.year()))
}

/// Lay out `tasks` on the month containing `month`. Days before the 1st and
/// after the last day are filled from the neighbouring months so every week
/// has seven days.
pub fn build_month(
    month: NaiveDate,
    tasks: &[Task],
    today: NaiveDate,
    now: NaiveDateTime,
) -> MonthCalendar {
    let first = month.with_day(1).unwrap_or(month);
    let next_first = first.checked_add_months(Months::new(1));
    let last = next_first
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX);

    let lead = Duration::days(first.weekday().num_days_from_monday() as i64);
    let trail = Duration::days(6 - last.weekday().num_days_from_monday() as i64);
    let grid_start = first.checked_sub_signed(lead).unwrap_or(first);
    let grid_end = last.checked_add_signed(trail).unwrap_or(last);

    let mut weeks = Vec::new();
    let mut week = Vec::with_capacity(7);
    let mut day = grid_start;
    while day <= grid_end {
        let mut events: Vec<(Option<NaiveDateTime>, CalendarEvent)> = tasks
            .iter()
            .filter_map(|t| {
                let due = t.due()?;
                (due.date() == day).then(|| {
                    let time = (!t.is_holiday()).then(|| due.format("%H:%M").to_string());
                    (
                        Some(due),
                        CalendarEvent {
                            task_id: t.id.clone(),
                            title: t.event_title(),
                            time,
                            kind: t.kind(now),
                        },
                    )
                })
            })
            .collect();
        events.sort_by_key(|(due, _)| *due);

        week.push(CalendarDay {
            date: day,
            in_month: day.month() == first.month(),
            is_today: day == today,
            events: events.into_iter().map(|(_, e)| e).collect(),
        });
        if week.len() == 7 {
            weeks.push(std::mem::take(&mut week));
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if !week.is_empty() {
        weeks.push(week);
    }

    MonthCalendar {
        title: first.format("%B %Y").to_string(),
        weeks,
        prev_month: first
            .checked_sub_months(Months::new(1))
            .unwrap_or(first)
            .format("%Y-%m")
            .to_string(),
        next_month: next_first.unwrap_or(first).format("%Y-%m").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, due: &str) -> Task {
        serde_json::from_value(serde_json::json!({
            "_id": id, "title": "Sweep", "assignedRoom": "101", "dueDate": due
        }))
        .unwrap()
    }

    #[test]
    fn weeks_start_on_monday_and_cover_the_month() {
        let month = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = today.and_hms_opt(12, 0, 0).unwrap();
        let cal = build_month(month, &[], today, now);

        // Oct 1 2026 is a Thursday; the grid starts Monday Sep 28.
        assert_eq!(cal.weeks[0][0].date, NaiveDate::from_ymd_opt(2026, 9, 28).unwrap());
        assert!(!cal.weeks[0][0].in_month);
        assert!(cal.weeks.iter().all(|w| w.len() == 7));
        let last_week = cal.weeks.last().unwrap();
        assert_eq!(last_week[6].date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(cal.title, "October 2026");
        assert_eq!(cal.prev_month, "2026-09");
        assert_eq!(cal.next_month, "2026-11");
        assert_eq!(cal.weeks.iter().flatten().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn events_land_on_their_day_sorted_by_time() {
        let month = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = today.and_hms_opt(12, 0, 0).unwrap();
        let tasks = vec![task("late", "2026-10-20T15:00"), task("early", "2026-10-20T08:00")];
        let cal = build_month(month, &tasks, today, now);

        let day = cal
            .weeks
            .iter()
            .flatten()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
            .unwrap();
        let ids: Vec<&str> = day.events.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
        assert_eq!(day.events[0].kind, TaskKind::Upcoming);
        assert_eq!(day.events[0].time.as_deref(), Some("08:00"));
    }

    #[test]
    fn parses_month_parameter() {
        assert_eq!(parse_month("2026-02"), NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(parse_month("+262142-12"), None);
        assert_eq!(parse_month("-262143-01"), None);
        assert_eq!(parse_month("1899-12"), None);
    }

    #[test]
    fn extreme_dates_do_not_panic() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = today.and_hms_opt(12, 0, 0).unwrap();

        let top = build_month(NaiveDate::MAX, &[], today, now);
        assert!(!top.weeks.is_empty());
        let bottom = build_month(NaiveDate::MIN, &[], today, now);
        assert!(!bottom.weeks.is_empty());
    }
}
