//! Markup loading tests
//!
//! HTML → DOM for the fragments the page scripts attach to.

use fz_html::parse;

#[test]
fn test_booking_markup() {
    let html = r#"
        <!DOCTYPE html>
        <html>
            <body>
                <form id="booking-form">
                    <input type="hidden" id="hidden-date">
                    <input type="hidden" id="hidden-time">
                    <button id="booking-submit-btn" type="submit" disabled>Odaberite</button>
                </form>
            </body>
        </html>
    "#;

    let doc = parse(html).unwrap();
    let form = doc.get_element_by_id("booking-form").unwrap();
    let submit = doc.get_element_by_id("booking-submit-btn").unwrap();

    assert!(doc.is_disabled(submit));
    assert_eq!(doc.query_all_within(form, "input").unwrap().len(), 2);
    assert_eq!(doc.value(doc.get_element_by_id("hidden-date").unwrap()), "");
}

#[test]
fn test_navigation_markup() {
    let html = r##"
        <header class="main-header">
            <button class="hamburger-btn">&#9776;</button>
        </header>
        <nav id="mobile-nav">
            <div class="mobile-nav-content">
                <button id="close-mobile-nav">X</button>
                <a href="#about">O nama</a>
                <a href="#contact">Kontakt</a>
            </div>
        </nav>
    "##;

    let doc = parse(html).unwrap();
    let links = doc.query_selector_all("#mobile-nav a").unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(doc.get_attr(links[1], "href"), Some("#contact"));
    assert!(doc.query_selector(".hamburger-btn").unwrap().is_some());
}
