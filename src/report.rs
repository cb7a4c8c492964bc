/// Derived views over collection snapshots
///
/// Pure functions: they take a snapshot and the current time, and never touch
/// the store. Passing `now` explicitly keeps them reproducible.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use std::collections::HashMap;

use crate::state::data::{Appointment, Sale};

/// Appointments on or after today (time of day ignored), ordered by date then
/// start time. Ties keep their input order.
pub fn upcoming_appointments(appointments: &[Appointment], now: NaiveDateTime) -> Vec<Appointment> {
    let today = now.date();
    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date >= today)
        .cloned()
        .collect();
    upcoming.sort_by_key(|appointment| (appointment.date, appointment.start_time));
    upcoming
}

/// Revenue for one period plus its bar height relative to the largest period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotal {
    pub total: f64,
    /// 0..=100
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary {
    pub today: PeriodTotal,
    pub week: PeriodTotal,
    pub month: PeriodTotal,
}

impl SalesSummary {
    /// Periods in display order with their labels
    pub fn periods(&self) -> [(&'static str, PeriodTotal); 3] {
        [("Today", self.today), ("This week", self.week), ("This month", self.month)]
    }
}

/// Monday of the week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// First day of the month containing `day`
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.day0()))
}

/// Totals for today, this week (from Monday) and this month.
///
/// A sale counts toward a period when its date is on or after the period's
/// first day; future-dated sales therefore count everywhere.
pub fn sales_summary(sales: &[Sale], now: NaiveDateTime) -> SalesSummary {
    let today = now.date();
    let total_since = |start: NaiveDate| -> f64 {
        sales
            .iter()
            .filter(|sale| sale.date >= start)
            .map(|sale| sale.cost)
            .sum()
    };

    let today_total = total_since(today);
    let week_total = total_since(week_start(today));
    let month_total = total_since(month_start(today));

    // Floor of 1 avoids dividing by zero on an empty ledger
    let max = today_total.max(week_total).max(month_total).max(1.0);
    let period = |total: f64| PeriodTotal {
        total,
        percentage: total / max * 100.0,
    };

    SalesSummary {
        today: period(today_total),
        week: period(week_total),
        month: period(month_total),
    }
}

/// One cell of the agenda month view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub appointment_count: usize,
}

/// Agenda month grid laid out Sunday-first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    pub first_day: NaiveDate,
    /// Empty cells before the 1st
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthCalendar {
    /// Rows of seven cells; `None` pads before the 1st and after the last day
    pub fn weeks(&self) -> Vec<[Option<CalendarDay>; 7]> {
        let mut cells: Vec<Option<CalendarDay>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().copied().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        cells
            .chunks(7)
            .map(|week| {
                let mut row = [None; 7];
                row.copy_from_slice(week);
                row
            })
            .collect()
    }
}

/// Build the month view for `year`/`month`; None for an invalid month
pub fn month_calendar(year: i32, month: u32, appointments: &[Appointment]) -> Option<MonthCalendar> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for appointment in appointments {
        *counts.entry(appointment.date).or_default() += 1;
    }

    let days = first_day
        .iter_days()
        .take_while(|day| *day < next_month)
        .map(|date| CalendarDay {
            date,
            appointment_count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect();

    Some(MonthCalendar {
        first_day,
        leading_blanks: first_day.weekday().num_days_from_sunday(),
        days,
    })
}

/// Header labels matching `MonthCalendar::weeks` columns
pub const WEEKDAY_HEADERS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];
