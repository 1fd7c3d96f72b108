//! Blood-pressure grading of a reading
//!
//! Grades follow the host application's table. Bands are checked from the
//! lowest up and either value alone selects a band, so the lower match wins.

use core::fmt;

use crate::packet::Reading;

/// Blood-pressure grade of one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    Optimal,
    Normal,
    HighNormal,
    Grade1,
    Grade2,
    Grade3,
    IsolatedSystolic,
}

impl Category {
    /// Label shown next to the reading
    pub const fn label(self) -> &'static str {
        match self {
            Category::Optimal => "Optimal",
            Category::Normal => "Normal",
            Category::HighNormal => "High Normal",
            Category::Grade1 => "Grade 1 Hypertension",
            Category::Grade2 => "Grade 2 Hypertension",
            Category::Grade3 => "Grade 3 Hypertension",
            Category::IsolatedSystolic => "Isolated Systolic Hypertension",
        }
    }

    /// Whether the grade is any form of hypertension
    pub const fn is_hypertension(self) -> bool {
        matches!(
            self,
            Category::Grade1 | Category::Grade2 | Category::Grade3 | Category::IsolatedSystolic
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Reading {
    /// Grade the systolic and diastolic values
    ///
    /// Returns `None` for the few combinations no band covers, such as a
    /// diastolic of exactly 110 with a low systolic.
    pub fn classify(&self) -> Option<Category> {
        let sys = self.systolic;
        let dia = self.diastolic;

        let category = if sys < 120 && dia < 80 {
            Category::Optimal
        } else if (120..=129).contains(&sys) || (80..=84).contains(&dia) {
            Category::Normal
        } else if (130..=139).contains(&sys) || (85..=89).contains(&dia) {
            Category::HighNormal
        } else if (140..=159).contains(&sys) || (90..=99).contains(&dia) {
            Category::Grade1
        } else if (160..=179).contains(&sys) || (100..=109).contains(&dia) {
            Category::Grade2
        } else if sys > 180 || dia > 110 {
            Category::Grade3
        } else if sys > 140 && dia < 90 {
            Category::IsolatedSystolic
        } else {
            return None;
        };
        Some(category)
    }
}
