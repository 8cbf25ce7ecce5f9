use chrono::Weekday;
use tabled::{Table, builder::Builder};

pub const DEFAULT_TASKS: [&str; 2] = ["Bar Chords", "Strumming Patterns"];

/// Days in display order, Sunday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: Weekday,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::with_tasks(&DEFAULT_TASKS)
    }
}

impl WeeklySchedule {
    /// Same task list on every day of the week.
    pub fn with_tasks(tasks: &[&str]) -> Self {
        let days = WEEK
            .iter()
            .map(|day| DaySchedule {
                day: *day,
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self { days }
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn tasks_for(&self, day: Weekday) -> &[String] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// One column per day, one row per task slot.
    pub fn to_table(&self) -> Table {
        let mut builder = Builder::default();
        builder.push_record(self.days.iter().map(|d| day_name(d.day).to_string()));

        let rows = self.days.iter().map(|d| d.tasks.len()).max().unwrap_or(0);
        for i in 0..rows {
            builder.push_record(
                self.days
                    .iter()
                    .map(|d| d.tasks.get(i).cloned().unwrap_or_default()),
            );
        }
        builder.build()
    }
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
