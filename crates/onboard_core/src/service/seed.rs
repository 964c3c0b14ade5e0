//! Default onboarding checklist.
//!
//! The template is a fixed constant; it does not vary by department or
//! position.

use crate::model::checklist::Task;

/// One entry of the default task checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTask {
    pub title: &'static str,
    pub description: &'static str,
}

/// Ordered tasks applied to every new employee created without `tasks`.
pub const ONBOARDING_TASK_TEMPLATE: [SeedTask; 8] = [
    SeedTask {
        title: "Employee review after 6 months",
        description: "Schedule and conduct a review meeting after 6 months.",
    },
    SeedTask {
        title: "Create competence plan",
        description: "Develop a competence plan for the employee.",
    },
    SeedTask {
        title: "Review internal systems",
        description: "Go through Tripletex, Teams, CV-partner, and other relevant systems.",
    },
    SeedTask {
        title: "Assign mentor and guesting in key projects",
        description: "Assign a mentor and arrange guesting in central projects if needed.",
    },
    SeedTask {
        title: "Create system accesses",
        description: "Set up necessary system accesses for the employee.",
    },
    SeedTask {
        title: "Order and deliver phone",
        description: "Order and hand over a phone to the employee.",
    },
    SeedTask {
        title: "Order and deliver PC/Mac",
        description: "Order and hand over a PC or Mac to the employee.",
    },
    SeedTask {
        title: "Order and deliver key card",
        description: "Order and hand over a key card to the employee.",
    },
];

/// Instantiates the template as pending tasks with fresh item ids.
pub fn default_onboarding_tasks() -> Vec<Task> {
    ONBOARDING_TASK_TEMPLATE
        .iter()
        .map(|seed| Task::new(seed.title, seed.description, None))
        .collect()
}
