use crate::err::ReportError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::map::Map;
use serde_json::Value;

/// A titled list of labelled values describing some computed result, which
/// can be rendered as XML, JSON or plain text. Fields are declared
/// explicitly, and keep the order in which they were added.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    title: String,
    fields: Vec<(String, Value)>,
}

impl Report {
    /// Create a new `Report` with no fields.
    /// # Example
    /// ```rust
    /// use geoloc::Report;
    /// use serde_json::json;
    ///
    /// let report = Report::new("Leg")
    ///     .field("Distance", json!(969954.166))
    ///     .field("Units", json!("m"));
    /// assert_eq!(report.to_json()["Leg"]["Units"], "m");
    /// ```
    pub fn new<T>(title: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Add a labelled value to the end of this report. The label is used
    /// as an XML element name, so it should not contain spaces.
    pub fn field<L>(mut self, label: L, value: Value) -> Self
    where
        L: Into<String>,
    {
        self.fields.push((label.into(), value));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Return the labelled values, in the order they were added.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Return the value with the given label, if there is one.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_label, _)| field_label == label)
            .map(|(_, value)| value)
    }

    /// Return this report as a JSON object with a single key, the title,
    /// whose value is an object containing every field.
    pub fn to_json(&self) -> Value {
        let fields: Map<String, Value> = self.fields.iter().cloned().collect();
        let mut root = Map::new();
        root.insert(self.title.clone(), Value::Object(fields));
        Value::Object(root)
    }

    /// Return this report as an XML element named after the title, with
    /// one tab-indented child element per field.
    pub fn to_xml(&self) -> Result<String, ReportError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

        writer.write_event(Event::Start(BytesStart::new(self.title.as_str())))?;
        for (label, value) in &self.fields {
            let text = value_to_text(value);
            writer.write_event(Event::Start(BytesStart::new(label.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(label.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.title.as_str())))?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)?;
        for (label, value) in &self.fields {
            write!(f, "\n{}:\t{}", label, value_to_text(value))?;
        }
        Ok(())
    }
}

/// Strings are written without JSON quotes.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::Report;
    use serde_json::json;

    fn sample() -> Report {
        Report::new("GeoLocation")
            .field("LocationName", json!("Tom & Jerry's <house>"))
            .field("Latitude", json!(40.5))
            .field("Elevation", json!(0.0))
    }

    #[test]
    fn fields_keep_declaration_order() {
        let report = sample();
        let labels: Vec<_> = report
            .fields()
            .iter()
            .map(|(label, _)| label.as_str())
            .collect();
        assert_eq!(labels, vec!["LocationName", "Latitude", "Elevation"]);
        assert_eq!(sample().get("Latitude"), Some(&json!(40.5)));
        assert_eq!(sample().get("Longitude"), None);
    }

    #[test]
    fn to_json() {
        let json = sample().to_json();
        assert_eq!(json["GeoLocation"]["LocationName"], "Tom & Jerry's <house>");
        assert_eq!(json["GeoLocation"]["Latitude"], 40.5);
    }

    #[test]
    fn to_xml_escapes_text() {
        let xml = sample().to_xml().unwrap();
        assert!(xml.starts_with("<GeoLocation>"));
        assert!(xml.ends_with("</GeoLocation>"));
        assert!(xml.contains("\t<Latitude>40.5</Latitude>"));
        assert!(xml.contains("\t<Elevation>0.0</Elevation>"));
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&lt;house&gt;"));
        assert!(!xml.contains("<house>"));
    }

    #[test]
    fn display() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "GeoLocation\nLocationName:\tTom & Jerry's <house>\nLatitude:\t40.5\nElevation:\t0.0"
        );
    }
}
