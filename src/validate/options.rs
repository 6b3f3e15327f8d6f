//! Integration methods, days of the week, and options shared by branches and
//! edges.

use std::str::FromStr;

use crate::error::DefinitionError;
use crate::parse::types::CommonOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    Normal,
    ConvertToEdit,
}

impl IntegrationMethod {
    pub const ALL: [IntegrationMethod; 2] =
        [IntegrationMethod::Normal, IntegrationMethod::ConvertToEdit];

    pub fn as_str(self) -> &'static str {
        match self {
            IntegrationMethod::Normal => "normal",
            IntegrationMethod::ConvertToEdit => "convert-to-edit",
        }
    }
}

impl FromStr for IntegrationMethod {
    type Err = ();

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        IntegrationMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or(())
    }
}

/// Report `method` if it is not a recognised integration method.
pub fn check_integration_method(method: &str, context: &str, errors: &mut Vec<DefinitionError>) {
    if method.parse::<IntegrationMethod>().is_err() {
        errors.push(DefinitionError::UnknownIntegrationMethod {
            method: method.to_string(),
            context: context.to_string(),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOfWeek {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sun,
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sun => "sun",
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
            DayOfWeek::Sat => "sat",
        }
    }

    /// Accepts any token whose first three letters name a day, in any case:
    /// `Monday`, `MON`, `mon`.
    pub fn from_token(token: &str) -> Option<DayOfWeek> {
        let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
        DayOfWeek::ALL.into_iter().find(|d| d.as_str() == prefix)
    }
}

/// Validate common options, normalizing integration window day tokens to
/// their three-letter lower-case form.
///
/// An unrecognised day is fatal.
pub fn validate_common_options(options: &mut CommonOptions) -> Result<(), DefinitionError> {
    let Some(panes) = options.integration_window.as_mut() else {
        return Ok(());
    };

    for days in panes.iter_mut().filter_map(|p| p.days_of_the_week.as_mut()) {
        for day in days.iter_mut() {
            let normalized = DayOfWeek::from_token(day)
                .ok_or_else(|| DefinitionError::UnknownDayOfWeek(day.clone()))?;
            *day = normalized.as_str().to_string();
        }
    }
    Ok(())
}
