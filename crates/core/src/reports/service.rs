//! Aggregation logic for budget and spending reports.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budget::{BudgetFigures, BudgetService};
use crate::reports::types::{BudgetLine, BudgetSummary, CategoryTotal, MonthlyBucket};

/// Number of buckets in the monthly spending series.
pub const MONTHLY_WINDOW: usize = 12;

/// Stateless report calculators over store-provided rows.
pub struct ReportService;

impl ReportService {
    /// Builds one report row with its utilization.
    #[must_use]
    pub fn budget_line(id: Uuid, name: String, figures: BudgetFigures) -> BudgetLine {
        let utilization_percent =
            BudgetService::utilization_percent(figures.allocated, figures.spent);
        BudgetLine {
            id,
            name,
            figures,
            utilization_percent,
        }
    }

    /// Institution budget summary from per-department and per-project rows.
    ///
    /// Totals combine both kinds; overall utilization is computed over the
    /// combined figures.
    #[must_use]
    pub fn budget_summary(
        departments: Vec<(Uuid, String, BudgetFigures)>,
        projects: Vec<(Uuid, String, BudgetFigures)>,
    ) -> BudgetSummary {
        let mut allocated = Decimal::ZERO;
        let mut spent = Decimal::ZERO;
        for (_, _, figures) in departments.iter().chain(projects.iter()) {
            allocated += figures.allocated;
            spent += figures.spent;
        }
        let totals = BudgetFigures::new(allocated, spent);
        let utilization_percent = BudgetService::utilization_percent(allocated, spent);

        let department_count = departments.len();
        let to_lines = |rows: Vec<(Uuid, String, BudgetFigures)>| {
            rows.into_iter()
                .map(|(id, name, figures)| Self::budget_line(id, name, figures))
                .collect()
        };

        BudgetSummary {
            totals,
            utilization_percent,
            department_count,
            departments: to_lines(departments),
            projects: to_lines(projects),
        }
    }

    /// Orders category totals by total descending, category ascending on ties.
    #[must_use]
    pub fn category_breakdown(mut rows: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        rows
    }

    /// Orders monthly rows chronologically and keeps the most recent
    /// [`MONTHLY_WINDOW`] buckets.
    #[must_use]
    pub fn monthly_spending(mut rows: Vec<MonthlyBucket>) -> Vec<MonthlyBucket> {
        rows.sort_by_key(MonthlyBucket::ordinal);
        if rows.len() > MONTHLY_WINDOW {
            rows.drain(..rows.len() - MONTHLY_WINDOW);
        }
        rows
    }

    /// Trailing twelve-month series ending at `(end_year, end_month)`,
    /// zero-filling months with no spending.
    ///
    /// `rows` comes from one grouped query; months outside the window are
    /// ignored.
    #[must_use]
    pub fn trailing_months(
        end_year: i32,
        end_month: u32,
        rows: &[MonthlyBucket],
    ) -> Vec<MonthlyBucket> {
        let end_ordinal = i64::from(end_year) * 12 + i64::from(end_month);
        let start_ordinal = end_ordinal - (MONTHLY_WINDOW as i64 - 1);

        (start_ordinal..=end_ordinal)
            .map(|ordinal| {
                // ordinal = year * 12 + month with month in 1..=12
                let year = ((ordinal - 1) / 12) as i32;
                let month = ((ordinal - 1) % 12 + 1) as u32;
                let total = rows
                    .iter()
                    .find(|row| row.ordinal() == ordinal)
                    .map_or(Decimal::ZERO, |row| row.total);
                MonthlyBucket::new(year, month, total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn figures(allocated: Decimal, spent: Decimal) -> BudgetFigures {
        BudgetFigures::new(allocated, spent)
    }

    #[test]
    fn test_budget_line_utilization() {
        let line = ReportService::budget_line(
            Uuid::new_v4(),
            "Engineering".into(),
            figures(dec!(300000), dec!(150000)),
        );
        assert_eq!(line.utilization_percent, dec!(50.00));
        assert_eq!(line.figures.remaining, dec!(150000));
    }

    #[test]
    fn test_budget_summary_combines_departments_and_projects() {
        let summary = ReportService::budget_summary(
            vec![
                (Uuid::new_v4(), "Ops".into(), figures(dec!(1000), dec!(250))),
                (Uuid::new_v4(), "HR".into(), figures(dec!(500), dec!(250))),
            ],
            vec![(
                Uuid::new_v4(),
                "Website".into(),
                figures(dec!(500), dec!(500)),
            )],
        );
        assert_eq!(summary.totals.allocated, dec!(2000));
        assert_eq!(summary.totals.spent, dec!(1000));
        assert_eq!(summary.totals.remaining, dec!(1000));
        assert_eq!(summary.utilization_percent, dec!(50.00));
        assert_eq!(summary.department_count, 2);
        assert_eq!(summary.departments.len(), 2);
        assert_eq!(summary.projects.len(), 1);
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = ReportService::budget_summary(vec![], vec![]);
        assert_eq!(summary.totals, BudgetFigures::zero());
        assert_eq!(summary.utilization_percent, Decimal::ZERO);
        assert_eq!(summary.department_count, 0);
        assert!(summary.departments.is_empty());
        assert!(summary.projects.is_empty());
    }

    #[test]
    fn test_category_breakdown_sorted_desc() {
        let rows = vec![
            CategoryTotal {
                category: "travel".into(),
                total: dec!(100),
                count: 2,
            },
            CategoryTotal {
                category: "supplies".into(),
                total: dec!(400),
                count: 5,
            },
            CategoryTotal {
                category: "software".into(),
                total: dec!(100),
                count: 1,
            },
        ];
        let sorted = ReportService::category_breakdown(rows);
        assert_eq!(sorted[0].category, "supplies");
        // ties break alphabetically
        assert_eq!(sorted[1].category, "software");
        assert_eq!(sorted[2].category, "travel");
    }

    #[test]
    fn test_monthly_spending_caps_at_twelve() {
        let rows: Vec<MonthlyBucket> = (1..=14)
            .map(|i| MonthlyBucket::new(2024 + (i - 1) / 12, ((i - 1) % 12 + 1) as u32, dec!(10)))
            .collect();
        let result = ReportService::monthly_spending(rows);
        assert_eq!(result.len(), 12);
        assert_eq!((result[0].year, result[0].month), (2024, 3));
        assert_eq!((result[11].year, result[11].month), (2025, 2));
    }

    #[test]
    fn test_monthly_spending_sorts_chronologically() {
        let rows = vec![
            MonthlyBucket::new(2025, 3, dec!(3)),
            MonthlyBucket::new(2025, 1, dec!(1)),
            MonthlyBucket::new(2024, 12, dec!(12)),
        ];
        let result = ReportService::monthly_spending(rows);
        assert_eq!(
            result
                .iter()
                .map(|b| (b.year, b.month))
                .collect::<Vec<_>>(),
            vec![(2024, 12), (2025, 1), (2025, 3)]
        );
    }

    #[test]
    fn test_trailing_months_zero_fills() {
        let rows = vec![
            MonthlyBucket::new(2025, 8, dec!(500)),
            MonthlyBucket::new(2025, 3, dec!(120)),
            // a month before the window, must be ignored
            MonthlyBucket::new(2023, 1, dec!(999)),
        ];
        let series = ReportService::trailing_months(2025, 8, &rows);
        assert_eq!(series.len(), 12);
        assert_eq!((series[0].year, series[0].month), (2024, 9));
        assert_eq!((series[11].year, series[11].month), (2025, 8));
        assert_eq!(series[11].total, dec!(500));
        assert_eq!(series[6].total, dec!(120)); // 2025-03
        let zero_months = series.iter().filter(|b| b.total == Decimal::ZERO).count();
        assert_eq!(zero_months, 10);
    }

    #[test]
    fn test_trailing_months_crosses_year_boundary() {
        let series = ReportService::trailing_months(2025, 1, &[]);
        assert_eq!((series[0].year, series[0].month), (2024, 2));
        assert_eq!((series[11].year, series[11].month), (2025, 1));
        assert!(series.iter().all(|b| b.total == Decimal::ZERO));
    }
}
