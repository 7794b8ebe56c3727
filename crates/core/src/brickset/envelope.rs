//! SOAP request envelopes for the Brickset v3 endpoint.

/// Namespace of the Brickset API operations.
pub const API_NAMESPACE: &str = "https://brickset.com/api/";

/// Value of the `SOAPAction` header for an operation.
pub fn soap_action(operation: &str) -> String {
    format!("{}{}", API_NAMESPACE, operation)
}

/// Build a SOAP 1.1 envelope calling `operation` with the given child
/// elements. Values are XML-escaped.
pub fn envelope(operation: &str, fields: &[(&str, &str)]) -> String {
    let body: String = fields
        .iter()
        .map(|(name, value)| format!("      <{name}>{}</{name}>\n", escape_xml(value)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{operation} xmlns="{API_NAMESPACE}">
{body}    </{operation}>
  </soap:Body>
</soap:Envelope>"#
    )
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
