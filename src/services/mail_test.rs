use super::*;

#[test]
fn html_escape_covers_markup_characters() {
    assert_eq!(html_escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    assert_eq!(html_escape("Grüße"), "Grüße");
}

#[test]
fn render_fills_known_placeholders() {
    let out = render("Hallo {{NAME}}, Code {{CODE}}.", &[("NAME", "Anna"), ("CODE", "AB2CD")]);
    assert_eq!(out, "Hallo Anna, Code AB2CD.");
}

#[test]
fn render_escapes_values() {
    let out = render("<p>{{MESSAGE}}</p>", &[("MESSAGE", "<script>alert(1)</script>")]);
    assert_eq!(out, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
}

#[test]
fn render_does_not_expand_placeholders_inside_values() {
    let out = render("{{NAME}} / {{SECRET}}", &[("NAME", "{{SECRET}}"), ("SECRET", "x")]);
    assert_eq!(out, "{{SECRET}} / x");
}

#[test]
fn render_keeps_unknown_and_unterminated_placeholders() {
    assert_eq!(render("a {{UNKNOWN}} b", &[]), "a {{UNKNOWN}} b");
    assert_eq!(render("a {{OPEN", &[("OPEN", "x")]), "a {{OPEN");
}

#[test]
fn verification_mail_contains_code_and_ttl() {
    let mail = verification_mail("k12345678@students.jku.at", "AB2CD", "KS Steuern", 30);
    assert_eq!(mail.to, "k12345678@students.jku.at");
    assert!(mail.html.contains("AB2CD"));
    assert!(mail.html.contains("KS Steuern"));
    assert!(mail.html.contains("30 Minuten gültig"));
    assert!(mail.html.contains("NICHT gespeichert"));
    assert!(mail.text.contains("Dein Verifizierungscode: AB2CD"));
    assert!(mail.reply_to.is_none());
}

#[test]
fn verification_mail_escapes_lva_name() {
    let mail = verification_mail("a@students.jku.at", "AB2CD", "SE <Change>", 30);
    assert!(mail.html.contains("SE &lt;Change&gt;"));
}
