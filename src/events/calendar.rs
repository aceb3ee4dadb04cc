use rocket::request::FromParam;
use serde::ser::{Serialize, Serializer};
use std::fmt;
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CalendarError {
    UnknownMonth(String),
    YearOutOfRange(i32),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::UnknownMonth(input) => write!(f, "unknown month: {input:?}"),
            CalendarError::YearOutOfRange(year) => write!(f, "year {year} is out of range"),
        }
    }
}

impl std::error::Error for CalendarError {}

/// A month named in full, e.g. `"october"` or `"October"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MonthName(Month);

impl MonthName {
    /// Capitalizes the input (first letter upper case, the rest lower case)
    /// and looks it up in [`MONTH_NAMES`].
    pub(crate) fn parse(input: &str) -> Result<Self, CalendarError> {
        let capitalized = capitalize(input);
        MONTH_NAMES
            .iter()
            .position(|name| *name == capitalized)
            .and_then(|index| u8::try_from(index + 1).ok())
            .and_then(|number| Month::try_from(number).ok())
            .map(MonthName)
            .ok_or_else(|| CalendarError::UnknownMonth(input.to_owned()))
    }

    pub(crate) fn month(self) -> Month {
        self.0
    }

    pub(crate) fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(u8::from(self.0)) - 1]
    }
}

impl<'a> FromParam<'a> for MonthName {
    type Error = CalendarError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        MonthName::parse(param)
    }
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A single month of a single year.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MonthView {
    first_day: Date,
}

impl MonthView {
    pub(crate) fn new(year: i32, month: MonthName) -> Result<Self, CalendarError> {
        if !YEARS.contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        Date::from_calendar_date(year, month.month(), 1)
            .map(|first_day| MonthView { first_day })
            .map_err(|_| CalendarError::YearOutOfRange(year))
    }

    /// The month containing `date`, e.g. today's month.
    pub(crate) fn containing(date: Date) -> Self {
        MonthView {
            first_day: date.replace_day(1).unwrap_or(date),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first_day.month()
    }

    pub(crate) fn name(&self) -> &'static str {
        MonthName(self.month()).name()
    }

    pub(crate) fn number(&self) -> u8 {
        self.month().into()
    }

    pub(crate) fn days(&self) -> u8 {
        (28..=31)
            .rev()
            .find(|day| self.first_day.replace_day(*day).is_ok())
            .unwrap_or(28)
    }

    /// Start (inclusive) and end (exclusive) of the month.
    /// The end is `None` for the very last representable month.
    pub(crate) fn range(&self) -> (PrimitiveDateTime, Option<PrimitiveDateTime>) {
        let start = PrimitiveDateTime::new(self.first_day, Time::MIDNIGHT);
        let end = self
            .first_day
            .replace_day(self.days())
            .ok()
            .and_then(Date::next_day)
            .map(|next_month| PrimitiveDateTime::new(next_month, Time::MIDNIGHT));
        (start, end)
    }

    pub(crate) fn grid(&self) -> CalendarGrid {
        CalendarGrid {
            leading_blanks: self.first_day.weekday().number_days_from_monday(),
            days: self.days(),
        }
    }
}

/// Monday-first weeks of day cells, with `None` for the cells
/// before the first and after the last day of the month.
/// Serializes as a list of weeks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct CalendarGrid {
    leading_blanks: u8,
    days: u8,
}

pub(crate) type Week = [Option<u8>; 7];

impl CalendarGrid {
    pub(crate) fn weeks(&self) -> impl Iterator<Item = Week> + '_ {
        let cells = u16::from(self.leading_blanks) + u16::from(self.days);
        (0..cells.div_ceil(7)).map(move |week| {
            std::array::from_fn(|weekday| {
                let cell = week * 7 + weekday as u16;
                cell.checked_sub(u16::from(self.leading_blanks))
                    .map(|offset| offset + 1)
                    .filter(|day| *day <= u16::from(self.days))
                    .and_then(|day| u8::try_from(day).ok())
            })
        })
    }
}

impl Serialize for CalendarGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.weeks())
    }
}
