use crate::config::Locale;
use crate::models::Summary;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplaySummary {
    pub completed: u32,
    pub total: u32,
    pub completed_percentage: u32,
    pub days: Vec<DisplayDay>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayDay {
    pub date: NaiveDate,
    pub weekday_label: String,
    pub date_label: String,
    pub entries: Vec<DisplayCompletion>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayCompletion {
    pub id: String,
    pub title: String,
    pub time_label: String,
}

pub fn completed_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed);
    let total = u64::from(total);
    ((completed * 200 + total) / (total * 2)) as u32
}

pub fn derive_view(summary: &Summary, locale: Locale) -> DisplaySummary {
    DisplaySummary {
        completed: summary.completed,
        total: summary.total,
        completed_percentage: completed_percentage(summary.completed, summary.total),
        days: group_by_day(summary, locale),
    }
}

fn group_by_day(summary: &Summary, locale: Locale) -> Vec<DisplayDay> {
    let Some(goals_per_day) = &summary.goals_per_day else {
        return Vec::new();
    };

    let mut days: Vec<DisplayDay> = Vec::new();
    for goal in goals_per_day.values().flatten() {
        let date = goal.completed_at.date_naive();
        let entry = DisplayCompletion {
            id: goal.id.clone(),
            title: goal.title.clone(),
            time_label: goal.completed_at.format("%H:%M").to_string(),
        };
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.entries.push(entry),
            None => days.push(DisplayDay {
                date,
                weekday_label: weekday_name(date.weekday(), locale).to_string(),
                date_label: date_label(date, locale),
                entries: vec![entry],
            }),
        }
    }

    // Stable, so entries within a day keep the order they arrived in.
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Header for the week containing `today`, e.g. "12 to 18 October".
pub fn week_range_label(today: NaiveDate, locale: Locale) -> String {
    let start = week_start(today);
    let end = start + Duration::days(6);
    let month = capitalize(month_name(today.month(), locale));
    match locale {
        Locale::En => format!("{:02} to {:02} {}", start.day(), end.day(), month),
        Locale::PtBr => format!("{:02} a {:02} de {}", start.day(), end.day(), month),
    }
}

fn date_label(date: NaiveDate, locale: Locale) -> String {
    let month = month_name(date.month(), locale);
    match locale {
        Locale::En => format!("{} {}", capitalize(month), date.day()),
        Locale::PtBr => format!("{} de {}", date.day(), month),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn weekday_name(weekday: Weekday, locale: Locale) -> &'static str {
    const EN: [&str; 7] = [
        "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    ];
    const PT_BR: [&str; 7] = [
        "domingo",
        "segunda-feira",
        "terça-feira",
        "quarta-feira",
        "quinta-feira",
        "sexta-feira",
        "sábado",
    ];
    let index = weekday.num_days_from_sunday() as usize;
    match locale {
        Locale::En => EN[index],
        Locale::PtBr => PT_BR[index],
    }
}

fn month_name(month: u32, locale: Locale) -> &'static str {
    const EN: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    const PT_BR: [&str; 12] = [
        "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
        "outubro", "novembro", "dezembro",
    ];
    let index = (month.clamp(1, 12) - 1) as usize;
    match locale {
        Locale::En => EN[index],
        Locale::PtBr => PT_BR[index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletedGoal;
    use chrono::DateTime;
    use std::collections::BTreeMap;

    fn completed(id: &str, title: &str, at: &str) -> CompletedGoal {
        CompletedGoal {
            id: id.to_string(),
            title: title.to_string(),
            completed_at: DateTime::parse_from_rfc3339(at).unwrap(),
        }
    }

    #[test]
    fn eight_of_fifteen_is_fifty_three_percent() {
        let summary = Summary {
            completed: 8,
            total: 15,
            goals_per_day: None,
        };
        assert_eq!(derive_view(&summary, Locale::En).completed_percentage, 53);
    }

    #[test]
    fn percentage_rounds_half_up_and_stays_in_range() {
        assert_eq!(completed_percentage(1, 8), 13);
        assert_eq!(completed_percentage(1, 3), 33);
        assert_eq!(completed_percentage(2, 3), 67);
        assert_eq!(completed_percentage(0, 0), 0);
        for total in 1..=21 {
            for done in 0..=total {
                let expected = (f64::from(done) * 100.0 / f64::from(total)).round() as u32;
                let percentage = completed_percentage(done, total);
                assert_eq!(percentage, expected, "{done}/{total}");
                assert!(percentage <= 100);
            }
        }
    }

    #[test]
    fn groups_by_completion_date_most_recent_first() {
        let mut goals_per_day = BTreeMap::new();
        goals_per_day.insert(
            "2026-10-13".to_string(),
            vec![completed("c1", "Read", "2026-10-13T08:00:00-03:00")],
        );
        goals_per_day.insert(
            "2026-10-15".to_string(),
            vec![
                completed("c3", "Run", "2026-10-15T19:45:00-03:00"),
                completed("c2", "Read", "2026-10-15T06:30:00-03:00"),
            ],
        );
        let summary = Summary {
            completed: 3,
            total: 6,
            goals_per_day: Some(goals_per_day),
        };

        let view = derive_view(&summary, Locale::En);
        assert_eq!(view.completed_percentage, 50);
        assert_eq!(view.days.len(), 2);

        let latest = &view.days[0];
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(latest.weekday_label, "Thursday");
        assert_eq!(latest.date_label, "October 15");
        let ids: Vec<_> = latest.entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["c3", "c2"]);
        assert_eq!(latest.entries[0].time_label, "19:45");

        assert_eq!(view.days[1].entries[0].title, "Read");
    }

    #[test]
    fn missing_goals_per_day_yields_no_days() {
        let summary = Summary {
            completed: 0,
            total: 4,
            goals_per_day: None,
        };
        assert!(derive_view(&summary, Locale::PtBr).days.is_empty());
    }

    #[test]
    fn portuguese_labels() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(weekday_name(date.weekday(), Locale::PtBr), "quarta-feira");
        assert_eq!(date_label(date, Locale::PtBr), "4 de março");
        assert_eq!(week_range_label(date, Locale::PtBr), "01 a 07 de Março");
    }

    #[test]
    fn week_starts_on_sunday() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(week_start(saturday), NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(week_start(sunday), sunday);
        assert_eq!(week_range_label(sunday, Locale::En), "18 to 24 October");
    }
}
