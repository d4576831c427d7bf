//! Page markup for the employee screens.
//!
//! Pure functions from data to [`Markup`]. Elements the containers and tests
//! address carry fixed `data-testid` values (see `test_ids`).

use maud::{html, Markup, DOCTYPE};

use billed_common::constants::{test_ids, BILLS_TITLE, NEW_BILL_TITLE};
use billed_common::types::DisplayBill;
use billed_types::session::UserSession;
use billed_utils::format::format_amount;

/// Which vertical-layout icon is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveIcon {
    Window,
    Mail,
}

/// Input of [`bills_ui`]: loading wins over error, error wins over data.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillsView<'a> {
    pub bills: &'a [DisplayBill],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub session: Option<&'a UserSession>,
}

/// Full HTML document around a page body.
pub fn document(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                title { "Billed" }
            }
            body {
                div #root { (body) }
            }
        }
    }
}

/// Left-hand navigation. The active icon is highlighted for employees only.
pub fn vertical_layout(session: Option<&UserSession>, active: ActiveIcon) -> Markup {
    let employee = session.is_some_and(UserSession::is_employee);
    html! {
        div.vertical-navbar {
            div.layout-title { "Billed" }
            div #layout-icon1 .active-icon[employee && active == ActiveIcon::Window]
                data-testid=(test_ids::ICON_WINDOW) { "▤" }
            div #layout-icon2 .active-icon[employee && active == ActiveIcon::Mail]
                data-testid=(test_ids::ICON_MAIL) { "✉" }
        }
    }
}

pub fn loading_page(session: Option<&UserSession>) -> Markup {
    html! {
        div.layout {
            (vertical_layout(session, ActiveIcon::Window))
            div.content #loading { "Loading..." }
        }
    }
}

pub fn error_page(session: Option<&UserSession>, error: &str) -> Markup {
    html! {
        div.layout {
            (vertical_layout(session, ActiveIcon::Window))
            div.content {
                div.content-header {
                    div.content-title { " Erreur " }
                }
                div data-testid=(test_ids::ERROR_MESSAGE) { (error) }
            }
        }
    }
}

fn row(bill: &DisplayBill) -> Markup {
    html! {
        tr data-bill-id=(bill.id) {
            td { (bill.expense_type) }
            td { (bill.name) }
            td data-raw-date=(bill.raw_date) { (bill.date) }
            td { (format_amount(bill.amount)) }
            td { (bill.status) }
            td {
                div.icon-actions {
                    div #eye data-testid=(test_ids::ICON_EYE)
                        data-bill-id=(bill.id)
                        data-bill-url=[bill.receipt_url()] { "👁" }
                }
            }
        }
    }
}

fn modal() -> Markup {
    html! {
        div.modal.fade id=(test_ids::MODAL_FILE) data-testid=(test_ids::MODAL_FILE)
            tabindex="-1" role="dialog" aria-hidden="true" {
            div.modal-dialog.modal-dialog-centered.modal-lg role="document" {
                div.modal-content {
                    div.modal-header {
                        h5.modal-title { "Justificatif" }
                    }
                    div.modal-body {}
                }
            }
        }
    }
}

/// The employee bills page.
pub fn bills_ui(view: BillsView<'_>) -> Markup {
    if view.loading {
        return loading_page(view.session);
    }
    if let Some(error) = view.error {
        return error_page(view.session, error);
    }

    html! {
        div.layout {
            (vertical_layout(view.session, ActiveIcon::Window))
            div.content {
                div.content-header {
                    div.content-title { (BILLS_TITLE) }
                    button.btn.btn-primary type="button" data-testid=(test_ids::BTN_NEW_BILL) {
                        "Nouvelle note de frais"
                    }
                }
                div #data-table {
                    table #example.table.table-striped style="width:100%" {
                        thead {
                            tr {
                                th { "Type" }
                                th { "Nom" }
                                th { "Date" }
                                th { "Montant" }
                                th { "Statut" }
                                th { "Actions" }
                            }
                        }
                        tbody data-testid=(test_ids::TBODY) {
                            @for bill in view.bills {
                                (row(bill))
                            }
                        }
                    }
                }
            }
            (modal())
        }
    }
}

/// The new-bill form. Submission is handled elsewhere; this is the shell.
pub fn new_bill_ui(session: Option<&UserSession>) -> Markup {
    html! {
        div.layout {
            (vertical_layout(session, ActiveIcon::Mail))
            div.content {
                div.content-header {
                    div.content-title { (NEW_BILL_TITLE) }
                }
                div.form-newbill-container.content-inner {
                    form data-testid=(test_ids::FORM_NEW_BILL) {
                        label for="expense-type" { "Type de dépense" }
                        select #expense-type data-testid="expense-type" required {
                            option { "Transports" }
                            option { "Restaurants et bars" }
                            option { "Hôtel et logement" }
                            option { "Services en ligne" }
                            option { "IT et électronique" }
                            option { "Equipement et matériel" }
                            option { "Fournitures de bureau" }
                        }
                        label for="expense-name" { "Nom de la dépense" }
                        input #expense-name type="text" data-testid="expense-name";
                        label for="datepicker" { "Date" }
                        input #datepicker type="date" data-testid="datepicker" required;
                        label for="amount" { "Montant TTC" }
                        input #amount type="number" data-testid="amount" required;
                        label for="vat" { "TVA" }
                        input #vat type="number" data-testid="vat";
                        input #pct type="number" data-testid="pct" required;
                        label for="commentary" { "Commentaire" }
                        textarea #commentary data-testid="commentary" {}
                        label for="file" { "Justificatif" }
                        input #file type="file" data-testid="file" required;
                        button #btn-send-bill .btn.btn-primary type="submit" { "Envoyer" }
                    }
                }
            }
        }
    }
}

pub fn login_ui() -> Markup {
    html! {
        div.login-page {
            h2 { "Employé" }
            form data-testid="form-employee" {
                input data-testid="employee-email-input" type="email" required;
                input data-testid="employee-password-input" type="password" required;
                button data-testid="employee-login-button" type="submit" { "Se connecter" }
            }
        }
    }
}

/// Body of the receipt modal. No URL means an empty container.
pub fn receipt_body(bill_url: Option<&str>, img_width: u32) -> Markup {
    html! {
        div.bill-proof-container style="text-align: center;" {
            @if let Some(url) = bill_url {
                img width=(img_width) src=(url) alt="Bill";
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billed_common::types::RawBill;

    fn display(id: &str, raw_date: &str, date: &str, url: Option<&str>) -> DisplayBill {
        let mut raw = RawBill::new(id, raw_date, "pending");
        raw.file_url = url.map(str::to_string);
        raw.into_display(date.into(), "En attente".into())
    }

    #[test]
    fn test_loading_page() {
        let html = bills_ui(BillsView {
            loading: true,
            error: Some("ignored"),
            ..Default::default()
        })
        .into_string();
        assert!(html.contains("Loading..."));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn test_error_page_has_message_and_no_rows() {
        let html = bills_ui(BillsView {
            error: Some("Erreur 404"),
            ..Default::default()
        })
        .into_string();
        assert!(html.contains("Erreur 404"));
        assert!(html.contains(r#"data-testid="error-message""#));
        assert!(!html.contains(test_ids::ICON_EYE));
    }

    #[test]
    fn test_rows_render_in_given_order() {
        let bills = vec![
            display("a", "2004-04-04", "4 Avr. 04", Some("https://x/a.jpg")),
            display("b", "2001-01-01", "1 Jan. 01", None),
        ];
        let html = bills_ui(BillsView {
            bills: &bills,
            ..Default::default()
        })
        .into_string();
        let a = html.find("4 Avr. 04").unwrap();
        let b = html.find("1 Jan. 01").unwrap();
        assert!(a < b);
        assert_eq!(html.matches(r#"data-testid="icon-eye""#).count(), 2);
        assert!(html.contains(r#"data-bill-url="https://x/a.jpg""#));
        assert!(html.contains(r#"data-testid="btn-new-bill""#));
        assert!(html.contains(r#"data-testid="modaleFile""#));
    }

    #[test]
    fn test_row_without_receipt_has_no_url_attribute() {
        let bills = vec![display("b", "2001-01-01", "1 Jan. 01", None)];
        let html = bills_ui(BillsView {
            bills: &bills,
            ..Default::default()
        })
        .into_string();
        assert!(!html.contains("data-bill-url"));
    }

    #[test]
    fn test_markup_is_escaped() {
        let mut bill = display("a", "2004-04-04", "4 Avr. 04", None);
        bill.name = "<script>alert(1)</script>".into();
        let html = bills_ui(BillsView {
            bills: std::slice::from_ref(&bill),
            ..Default::default()
        })
        .into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_employee_highlight() {
        let session = UserSession::employee("a@a");
        let html = vertical_layout(Some(&session), ActiveIcon::Window).into_string();
        assert_eq!(html.matches("active-icon").count(), 1);
        assert!(html.find("active-icon").unwrap() < html.find("icon-mail").unwrap());

        let html = vertical_layout(Some(&session), ActiveIcon::Mail).into_string();
        assert!(html.find("active-icon").unwrap() > html.find("icon-window").unwrap());

        let html = vertical_layout(None, ActiveIcon::Window).into_string();
        assert!(!html.contains("active-icon"));
    }

    #[test]
    fn test_new_bill_ui_header() {
        let html = new_bill_ui(None).into_string();
        assert!(html.contains(NEW_BILL_TITLE));
        assert!(html.contains(r#"data-testid="form-new-bill""#));
    }

    #[test]
    fn test_receipt_body() {
        let html = receipt_body(Some("https://x/a.jpg"), 400).into_string();
        assert!(html.contains(r#"<img width="400" src="https://x/a.jpg" alt="Bill">"#));
        let html = receipt_body(None, 400).into_string();
        assert!(!html.contains("<img"));
        assert!(html.contains("bill-proof-container"));
    }

    #[test]
    fn test_document_wraps_root() {
        let html = document(login_ui()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div id="root">"#));
    }
}
