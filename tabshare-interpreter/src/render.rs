use std::fmt::Write as _;
use tabshare_application::{BalanceReport, ParticipantDirectory};
use tabshare_domain::{Money, RoundingContext, Settlement};

/// Plain-text tables for the terminal.
pub struct ReportPresenter<'a> {
    directory: &'a dyn ParticipantDirectory,
    context: RoundingContext,
}

impl<'a> ReportPresenter<'a> {
    pub fn new(directory: &'a dyn ParticipantDirectory, context: RoundingContext) -> Self {
        Self { directory, context }
    }

    pub fn render_balances(&self, report: &BalanceReport) -> String {
        let mut out = String::with_capacity(1024);

        let header = ["Participant", "Paid", "Share", "Sent", "Received", "Balance"];
        let rows: Vec<[String; 6]> = report
            .summaries
            .iter()
            .map(|summary| {
                [
                    self.directory.label(&summary.id).to_string(),
                    self.money(summary.paid),
                    self.money(summary.share),
                    self.money(summary.sent),
                    self.money(summary.received),
                    self.money(summary.balance),
                ]
            })
            .collect();
        write_table(&mut out, &header, &rows);
        let _ = writeln!(out, "Total spent: {}", self.money(report.total_spent));

        if !report.expenses.is_empty() {
            let _ = writeln!(out, "\nSplits:");
            for expense in &report.expenses {
                let shares = expense
                    .split
                    .iter()
                    .map(|(id, share)| format!("{} {}", self.directory.label(id), self.money(*share)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "- {} ({} paid {}): {shares}",
                    expense.id,
                    self.directory.label(&expense.payer),
                    self.money(expense.amount),
                );
            }
        }

        if !report.warnings.is_empty() {
            let _ = writeln!(out, "\nWarnings:");
            for warning in &report.warnings {
                let _ = writeln!(
                    out,
                    "- {warning} (difference {})",
                    self.money(warning.difference())
                );
            }
        }

        let rejected = report.rejected_expenses.len() + report.rejected_payments.len();
        if rejected > 0 {
            let _ = writeln!(out, "\nSkipped records:");
            for err in &report.rejected_expenses {
                let _ = writeln!(out, "- {err}");
            }
            for err in &report.rejected_payments {
                let _ = writeln!(out, "- {err}");
            }
        }

        out
    }

    pub fn render_settlement(&self, settlement: &Settlement) -> String {
        if settlement.transfers.is_empty() {
            return "Everyone is settled up.\n".to_string();
        }

        let mut out = String::with_capacity(256);
        let header = ["From", "To", "Amount"];
        let rows: Vec<[String; 3]> = settlement
            .transfers
            .iter()
            .map(|transfer| {
                [
                    self.directory.label(&transfer.from).to_string(),
                    self.directory.label(&transfer.to).to_string(),
                    self.money(transfer.amount),
                ]
            })
            .collect();
        write_table(&mut out, &header, &rows);
        out
    }

    /// Rounds with the ledger's mode first; the precision flag alone truncates.
    fn money(&self, amount: Money) -> String {
        format!(
            "{:.*}",
            self.context.scale as usize,
            self.context.round(amount.as_decimal())
        )
    }
}

/// First column left-aligned, the rest right-aligned.
fn write_table<const N: usize>(out: &mut String, header: &[&str; N], rows: &[[String; N]]) {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut write_row = |cells: [&str; N]| {
        let line = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                if col == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    };

    write_row(*header);
    write_row(widths.map(|width| "-".repeat(width)).each_ref().map(String::as_str));
    for row in rows {
        write_row(row.each_ref().map(String::as_str));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabshare_application::{BatchPolicy, LedgerProcessor};
    use rstest::rstest;
    use tabshare_domain::{Expense, Participant, Payment, RoundingMode};
    use tabshare_infrastructure::InMemoryRecordStore;

    fn participants() -> Vec<Participant> {
        vec![
            Participant::new("a", "Ana"),
            Participant::new("b", "Beto"),
            Participant::new("c", "Cleo"),
        ]
    }

    fn report_for(store: &InMemoryRecordStore) -> tabshare_application::LedgerReport {
        LedgerProcessor::new(
            store,
            RoundingContext::cents_default(),
            BatchPolicy::CollectAndReport,
        )
        .expect("default context is valid")
        .compute_report()
        .expect("ledger should settle")
    }

    #[test]
    fn renders_balances_with_names() {
        let store = InMemoryRecordStore::new()
            .with_expense(Expense::equal("dinner", Money::from_i64(90), "a", ["a", "b", "c"]))
            .with_payment(Payment::new("p1", Money::new(-1, 0), "b", "a"));
        let report = report_for(&store);
        let directory = participants();

        let text = ReportPresenter::new(&directory, RoundingContext::cents_default())
            .render_balances(&report.balance);

        assert!(text.starts_with("Participant   Paid  Share  Sent  Received  Balance\n"));
        assert!(text.contains("Ana          90.00  30.00  0.00      0.00    60.00\n"));
        assert!(text.contains("Total spent: 90.00\n"));
        assert!(text.contains("- dinner (Ana paid 90.00): Ana 30.00, Beto 30.00, Cleo 30.00\n"));
        assert!(text.contains("Skipped records:\n- invalid payment p1"));
    }

    #[test]
    fn renders_transfers_or_settled_message() {
        let store = InMemoryRecordStore::new().with_expense(Expense::equal(
            "dinner",
            Money::from_i64(90),
            "a",
            ["a", "b", "c"],
        ));
        let report = report_for(&store);
        let directory = participants();
        let presenter = ReportPresenter::new(&directory, RoundingContext::cents_default());

        assert_eq!(
            presenter.render_settlement(&report.settlement),
            "From  To   Amount\n----  ---  ------\nBeto  Ana   30.00\nCleo  Ana   30.00\n"
        );
        assert_eq!(
            presenter.render_settlement(&report_for(&InMemoryRecordStore::new()).settlement),
            "Everyone is settled up.\n"
        );
    }

    #[rstest]
    #[case::half_up_midpoint(RoundingMode::HalfUp, Money::new(5005, 3), "5.01")]
    #[case::half_even_midpoint(RoundingMode::HalfEven, Money::new(5005, 3), "5.00")]
    #[case::below_midpoint(RoundingMode::HalfUp, Money::new(50049, 4), "5.00")]
    #[case::pads_whole_amounts(RoundingMode::HalfUp, Money::from_i64(7), "7.00")]
    #[case::negative(RoundingMode::HalfUp, Money::new(-1235, 3), "-1.24")]
    fn amounts_are_rounded_to_the_scale(
        #[case] rounding_mode: RoundingMode,
        #[case] amount: Money,
        #[case] expected: &str,
    ) {
        let directory = participants();
        let presenter = ReportPresenter::new(
            &directory,
            RoundingContext {
                scale: 2,
                rounding_mode,
            },
        );

        assert_eq!(presenter.money(amount), expected);
    }
}
