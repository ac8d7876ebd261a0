//! Demo data: one admin, a set of categories and sample issues.
//!
//! Loading is idempotent. The admin and each category are created only if
//! missing (matched by email / name), and sample issues are inserted only
//! into an empty issue table.

use std::sync::Arc;

use bugtracker_core::roles::ROLE_ADMIN;
use bugtracker_core::validation::{check_category, check_issue, IssueDraft};
use bugtracker_db::Store;

use crate::error::AppResult;
use crate::services::AccountService;

pub const DEMO_ADMIN_EMAIL: &str = "admin@bugtracker.com";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// `(name, description)` for every demo category.
pub const DEMO_CATEGORIES: [(&str, &str); 14] = [
    ("Bug", "Software bugs and defects that need to be fixed"),
    ("UI/UX", "User interface and user experience issues"),
    ("Performance", "Performance-related issues and optimizations"),
    ("Security", "Security vulnerabilities and authentication issues"),
    ("Database", "Database-related problems and data integrity issues"),
    ("API", "API endpoints and integration problems"),
    ("Mobile", "Mobile app specific issues and features"),
    ("Testing", "Testing framework and test coverage issues"),
    ("Documentation", "Documentation updates and improvements"),
    ("Deployment", "Deployment and infrastructure issues"),
    ("Accessibility", "Accessibility compliance and WCAG issues"),
    ("Internationalization", "Multi-language support and localization"),
    ("Backend", "Server-side logic and business rules"),
    ("Frontend", "Client-side JavaScript and CSS issues"),
];

struct DemoIssue {
    title: &'static str,
    description: &'static str,
    status: &'static str,
    priority: &'static str,
    category: &'static str,
}

const DEMO_ISSUES: [DemoIssue; 15] = [
    DemoIssue {
        title: "Login page not responsive on mobile devices",
        description: "The login form does not display properly on mobile devices. The input \
                      fields are too small and the submit button is cut off on smaller screens.",
        status: "open",
        priority: "high",
        category: "UI/UX",
    },
    DemoIssue {
        title: "Database query optimization needed",
        description: "The issue listing page is loading slowly due to inefficient database \
                      queries. Need to optimize the queries and add proper indexing.",
        status: "open",
        priority: "high",
        category: "Performance",
    },
    DemoIssue {
        title: "Email notifications not working",
        description: "Users are not receiving email notifications when issues are assigned to \
                      them. The email service configuration needs to be fixed.",
        status: "closed",
        priority: "high",
        category: "Bug",
    },
    DemoIssue {
        title: "Fix pagination on mobile",
        description: "The pagination controls are not touch-friendly on mobile devices and need \
                      to be redesigned.",
        status: "open",
        priority: "medium",
        category: "UI/UX",
    },
    DemoIssue {
        title: "Memory leak in issue listing",
        description: "There is a memory leak when displaying large numbers of issues. Need to \
                      implement proper memory management.",
        status: "closed",
        priority: "high",
        category: "Performance",
    },
    DemoIssue {
        title: "SQL injection vulnerability in search",
        description: "The search functionality is vulnerable to SQL injection attacks. Need to \
                      implement proper parameterized queries.",
        status: "open",
        priority: "high",
        category: "Security",
    },
    DemoIssue {
        title: "API rate limiting not working",
        description: "The API endpoints are not properly rate limited, allowing potential abuse. \
                      Need to implement proper rate limiting.",
        status: "in_progress",
        priority: "medium",
        category: "API",
    },
    DemoIssue {
        title: "Database connection pooling needed",
        description: "Database connections are not being pooled efficiently, causing connection \
                      exhaustion under load.",
        status: "open",
        priority: "medium",
        category: "Database",
    },
    DemoIssue {
        title: "Mobile app crashes on iOS 17",
        description: "The mobile app crashes immediately on iOS 17 devices. Need to investigate \
                      compatibility issues.",
        status: "open",
        priority: "high",
        category: "Mobile",
    },
    DemoIssue {
        title: "Unit test coverage below 80%",
        description: "The current unit test coverage is only 65%. Need to add more tests to \
                      reach the 80% target.",
        status: "open",
        priority: "low",
        category: "Testing",
    },
    DemoIssue {
        title: "API documentation outdated",
        description: "The API documentation is outdated and missing several new endpoints. Need \
                      to update the docs.",
        status: "in_progress",
        priority: "low",
        category: "Documentation",
    },
    DemoIssue {
        title: "Docker container memory limit exceeded",
        description: "The Docker containers are exceeding their memory limits in production, \
                      causing crashes.",
        status: "open",
        priority: "high",
        category: "Deployment",
    },
    DemoIssue {
        title: "Screen reader compatibility issues",
        description: "The application is not fully compatible with screen readers. Need to \
                      improve accessibility.",
        status: "open",
        priority: "medium",
        category: "Accessibility",
    },
    DemoIssue {
        title: "Missing French translation strings",
        description: "Several UI elements are not translated to French. Need to add missing \
                      translation keys.",
        status: "open",
        priority: "low",
        category: "Internationalization",
    },
    DemoIssue {
        title: "Backend validation logic inconsistent",
        description: "The backend validation logic is inconsistent across different endpoints. \
                      Need to standardize.",
        status: "in_progress",
        priority: "medium",
        category: "Backend",
    },
];

/// Counts of rows created by one [`seed_demo_data`] run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admins: usize,
    pub categories: usize,
    pub issues: usize,
}

/// Load the demo data set into `store`, skipping anything already present.
pub async fn seed_demo_data(store: Arc<dyn Store>) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if store
        .find_admin_user_by_email(DEMO_ADMIN_EMAIL)
        .await?
        .is_none()
    {
        AccountService::new(Arc::clone(&store))
            .provision_admin(
                DEMO_ADMIN_EMAIL,
                DEMO_ADMIN_PASSWORD,
                vec![ROLE_ADMIN.to_string()],
            )
            .await?;
        report.admins += 1;
    }

    for (name, description) in DEMO_CATEGORIES {
        if store.find_category_by_name(name).await?.is_none() {
            let checked = check_category(name, Some(description))?;
            store.create_category(&checked).await?;
            report.categories += 1;
        }
    }

    if store.count_issues(None).await? == 0 {
        for demo in &DEMO_ISSUES {
            let category_id = store
                .find_category_by_name(demo.category)
                .await?
                .map(|c| c.id);
            let draft = IssueDraft {
                title: demo.title,
                description: demo.description,
                status: Some(demo.status),
                priority: Some(demo.priority),
                category_id,
            };
            let checked = check_issue(&draft, category_id.is_some())?;
            store.create_issue(&checked, None).await?;
            report.issues += 1;
        }
    }

    tracing::info!(
        admins = report.admins,
        categories = report.categories,
        issues = report.issues,
        "Demo data seeded",
    );
    Ok(report)
}
