//! Reference bills, served in demo mode and used by tests.
//!
//! Store order is deliberately not chronological.

use billed_common::types::RawBill;

const STORAGE: &str = "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o";

#[allow(clippy::too_many_arguments)]
fn bill(
    id: &str,
    date: &str,
    status: &str,
    name: &str,
    expense_type: &str,
    amount: f64,
    vat: &str,
    commentary: &str,
    comment_admin: &str,
    file_name: &str,
) -> RawBill {
    RawBill {
        amount: Some(amount),
        name: name.to_string(),
        file_url: Some(format!("{STORAGE}/justificatifs%2F{file_name}?alt=media")),
        file_name: Some(file_name.to_string()),
        commentary: Some(commentary.to_string()),
        comment_admin: Some(comment_admin.to_string()),
        email: "a@a".to_string(),
        expense_type: expense_type.to_string(),
        vat: Some(vat.to_string()),
        pct: Some(20.0),
        ..RawBill::new(id, date, status)
    }
}

/// The four reference bills, in store order.
pub fn bills() -> Vec<RawBill> {
    vec![
        bill(
            "47qAXb6fIm2zOKkLzMro",
            "2004-04-04",
            "pending",
            "encore",
            "Hôtel et logement",
            400.0,
            "80",
            "séminaire billed",
            "ok",
            "preview-facture-free-201801-pdf-1.jpg",
        ),
        bill(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "2001-01-01",
            "refused",
            "test1",
            "Transports",
            100.0,
            "",
            "plop",
            "en fait non",
            "1592770761.jpeg",
        ),
        bill(
            "UIUZtnPQvnbFnB0ozvJh",
            "2003-03-03",
            "accepted",
            "test3",
            "Services en ligne",
            300.0,
            "60",
            "",
            "bon bah d'accord",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
        ),
        bill(
            "qcCK3SzECmaZAGRrHjaC",
            "2002-02-02",
            "refused",
            "test2",
            "Restaurants et bars",
            200.0,
            "40",
            "test2",
            "pas la bonne facture",
            "preview-facture-free-201801-pdf-1.jpg",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fixture_ids_unique() {
        let bills = bills();
        let ids: HashSet<_> = bills.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), bills.len());
    }

    #[test]
    fn test_fixture_not_pre_sorted() {
        let dates: Vec<_> = bills().into_iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_ne!(dates, sorted);
    }
}
