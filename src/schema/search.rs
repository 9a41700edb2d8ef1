//! Purpose: Codec and projections for one row of a registry search result.
//! Exports: `SearchResult`.
//! Role: Decoded from the `data` array of a search response; can fetch its full record.
//! Invariants: `id` is the internal record id used for fetch/update, not `mitglieds_nummer`.
//! Invariants: `entries_*` wire keys map to unprefixed attribute names.
use super::codec::record_codec;
use super::member::Member;
use super::view::{self, View};
use crate::api::RecordApi;
use crate::core::datetime::DateTimeValue;
use crate::core::error::{Error, ErrorKind};
use std::fmt;

record_codec! {
    /// One search row; only the columns the search endpoint returns.
    pub struct SearchResult {
        descriptor: String => "descriptor" as "descriptor",
        austritts_datum: DateTimeValue => "entries_austrittsDatum" as "austrittsDatum",
        beitragsarten: String => "entries_beitragsarten" as "beitragsarten",
        eintrittsdatum: DateTimeValue => "entries_eintrittsdatum" as "eintrittsdatum",
        email: String => "entries_email" as "email",
        email_vertretungsberechtigter: String
            => "entries_emailVertretungsberechtigter" as "emailVertretungsberechtigter",
        erste_taetigkeit_id: i64 => "entries_ersteTaetigkeitId" as "ersteTaetigkeitId",
        erste_untergliederung_id: i64
            => "entries_ersteUntergliederungId" as "ersteUntergliederungId",
        fix_beitrag: String => "entries_fixBeitrag" as "fixBeitrag",
        geburts_datum: DateTimeValue => "entries_geburtsDatum" as "geburtsDatum",
        generic_field1: String => "entries_genericField1" as "genericField1",
        generic_field2: String => "entries_genericField2" as "genericField2",
        geschlecht: String => "entries_geschlecht" as "geschlecht",
        entry_id: i64 => "entries_id" as "entryId",
        jungpfadfinder: String => "entries_jungpfadfinder" as "jungpfadfinder",
        konfession: String => "entries_konfession" as "konfession",
        kontoverbindung: String => "entries_kontoverbindung" as "kontoverbindung",
        last_updated: DateTimeValue => "entries_lastUpdated" as "lastUpdated",
        mgl_type: String => "entries_mglType" as "mglType",
        mitglieds_nummer: i64 => "entries_mitgliedsNummer" as "mitgliedsNummer",
        nachname: String => "entries_nachname" as "nachname",
        pfadfinder: String => "entries_pfadfinder" as "pfadfinder",
        rover: String => "entries_rover" as "rover",
        row_css_class: String => "entries_rowCssClass" as "rowCssClass",
        spitzname: String => "entries_spitzname" as "spitzname",
        staatangehoerigkeit_text: String
            => "entries_staatangehoerigkeitText" as "staatangehoerigkeitText",
        staatsangehoerigkeit: String => "entries_staatsangehoerigkeit" as "staatsangehoerigkeit",
        status: String => "entries_status" as "status",
        stufe: String => "entries_stufe" as "stufe",
        telefax: String => "entries_telefax" as "telefax",
        telefon1: String => "entries_telefon1" as "telefon1",
        telefon2: String => "entries_telefon2" as "telefon2",
        telefon3: String => "entries_telefon3" as "telefon3",
        version: i64 => "entries_version" as "version",
        vorname: String => "entries_vorname" as "vorname",
        wiederverwenden_flag: bool => "entries_wiederverwendenFlag" as "wiederverwendenFlag",
        woelfling: String => "entries_woelfling" as "woelfling",
        id: i64 => "id" as "id",
        represented_class: String => "representedClass" as "representedClass",
    }
}

impl SearchResult {
    pub const FULL_VIEW_DENY_LIST: &'static [&'static str] = &[
        "representedClass",
        "mglType",
        "staatsangehoerigkeit",
        "status",
        "geschlecht",
        "eintrittsdatum",
        "id",
        "wiederverwendenFlag",
        "descriptor",
        "version",
        "lastUpdated",
        "entryId",
    ];

    pub const DEFAULT_SUMMARY_FIELDS: &'static [&'static str] =
        &["mitgliedsNummer", "vorname", "nachname", "geburtsDatum"];

    pub fn full_view(&self) -> View {
        view::full_view(self.view_entries(), Self::FULL_VIEW_DENY_LIST)
    }

    pub fn summary_view(&self, names: &[&str]) -> Result<View, Error> {
        view::summary_view(self.view_entries(), names)
    }

    pub fn summary(&self) -> Result<View, Error> {
        self.summary_view(Self::DEFAULT_SUMMARY_FIELDS)
    }

    /// Fetches the full record behind this row under the api's default unit.
    pub fn fetch_member(&self, api: &impl RecordApi) -> Result<Member, Error> {
        let id = self.id.ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message("search result carries no record id")
                .with_field("id")
        })?;
        let unit_id = api.require_default_unit()?;
        let raw = api.fetch_record(id, unit_id)?;
        Member::from_json(&raw)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchResult({:?})",
            self.descriptor.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SearchResult;
    use crate::api::{ApiResult, RecordApi};
    use crate::core::error::{Error, ErrorKind};
    use crate::schema::{FieldValue, Member};
    use serde_json::{Value, json};
    use std::cell::RefCell;

    const SEARCH_FIXTURE: &str = include_str!("../../tests/fixtures/search_result.json");
    const MEMBER_FIXTURE: &str = include_str!("../../tests/fixtures/member.json");

    fn fixture() -> Value {
        serde_json::from_str(SEARCH_FIXTURE).expect("fixture json")
    }

    struct StubApi {
        unit_id: Option<u64>,
        record: Value,
        calls: RefCell<Vec<(i64, u64)>>,
    }

    impl RecordApi for StubApi {
        fn default_unit_id(&self) -> Option<u64> {
            self.unit_id
        }

        fn fetch_record(&self, id: i64, unit_id: u64) -> ApiResult<Value> {
            self.calls.borrow_mut().push((id, unit_id));
            Ok(self.record.clone())
        }

        fn store_record(&self, _id: i64, _data: &Value, _unit_id: u64) -> ApiResult<Value> {
            Err(Error::new(ErrorKind::Usage).with_message("read-only stub"))
        }
    }

    #[test]
    fn decodes_prefixed_wire_keys() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        assert_eq!(row.id, Some(220695));
        assert_eq!(row.entry_id, Some(220695));
        assert_eq!(row.mitglieds_nummer, Some(31015));
        assert_eq!(row.vorname.as_deref(), Some("Lena"));
        assert_eq!(row.wiederverwenden_flag, Some(false));
        assert_eq!(row.austritts_datum, None);
        let born = row.geburts_datum.expect("birth date");
        assert_eq!((born.year(), born.month(), born.day()), (2006, 3, 14));
        assert_eq!(
            row.represented_class.as_deref(),
            Some("de.iconcept.nami.entity.mitglied.MitgliedListEntry")
        );
    }

    #[test]
    fn encode_reproduces_wire_values() {
        let raw = fixture();
        let row = SearchResult::from_json(&raw).expect("decode");
        let encoded = row.to_json();
        let wire_object = raw.as_object().expect("object");
        for (key, value) in encoded.as_object().expect("object") {
            if let Some(source) = wire_object.get(key) {
                assert_eq!(value, source, "wire key {key}");
            }
        }
        assert_eq!(SearchResult::from_json(&encoded).expect("re-decode"), row);
    }

    #[test]
    fn unknown_keys_are_ignored_and_missing_keys_are_null() {
        let row = SearchResult::from_json(&json!({
            "entries_mitgliedsNummer": 4711,
            "entries_lieblingsessen": "Stockbrot"
        }))
        .expect("decode");
        assert_eq!(row.mitglieds_nummer, Some(4711));
        assert_eq!(row.vorname, None);
        assert_eq!(row.to_json()["entries_geburtsDatum"], json!(""));
        assert_eq!(row.to_json()["entries_vorname"], Value::Null);
    }

    #[test]
    fn malformed_value_names_the_wire_key() {
        let err = SearchResult::from_json(&json!({"entries_geburtsDatum": "14.03.2006"}))
            .expect_err("bad date");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), Some("entries_geburtsDatum"));

        let err = SearchResult::from_json(&json!(["not", "an", "object"])).expect_err("array");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn full_view_skips_denied_and_empty_fields() {
        let row = SearchResult {
            mitglieds_nummer: Some(31015),
            spitzname: Some(String::new()),
            status: Some("aktiv".to_string()),
            ..SearchResult::default()
        };
        let view = row.full_view();
        assert_eq!(view.len(), 1);
        assert_eq!(
            view.get("mitgliedsNummer"),
            Some(&FieldValue::Integer(31015))
        );
    }

    #[test]
    fn full_view_of_fixture_excludes_deny_list() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        let view = row.full_view();
        for denied in SearchResult::FULL_VIEW_DENY_LIST {
            assert!(!view.contains(denied), "{denied} should be hidden");
        }
        assert!(view.contains("nachname"));
        assert!(!view.contains("telefax"));
    }

    #[test]
    fn default_summary_has_four_ordered_entries() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        let view = row.summary().expect("summary");
        assert_eq!(
            view.names().collect::<Vec<_>>(),
            SearchResult::DEFAULT_SUMMARY_FIELDS
        );
        assert_eq!(view.get("nachname").and_then(FieldValue::as_str), Some("Brandt"));
    }

    #[test]
    fn summary_accepts_exactly_the_declared_attribute_names() {
        let raw = fixture();
        let row = SearchResult::try_from(&raw).expect("decode");
        assert_eq!(SearchResult::FIELD_NAMES.len(), 39);
        let view = row.summary_view(SearchResult::FIELD_NAMES).expect("all names");
        assert_eq!(view.names().collect::<Vec<_>>(), SearchResult::FIELD_NAMES);
        for denied in SearchResult::FULL_VIEW_DENY_LIST {
            assert!(SearchResult::FIELD_NAMES.contains(denied), "{denied}");
        }
        let err = row
            .summary_view(&["entries_vorname"])
            .expect_err("wire keys are not attribute names");
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    }

    #[test]
    fn summary_with_unknown_field_fails() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        let err = row
            .summary_view(&["vorname", "strasse"])
            .expect_err("strasse is not a search column");
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
        assert_eq!(err.field(), Some("strasse"));
    }

    #[test]
    fn field_lookup_by_attribute_name() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        assert_eq!(row.field("id").expect("id"), Some(FieldValue::Integer(220695)));
        assert_eq!(row.field("telefax").expect("telefax"), None);
        let err = row.field("entries_id").expect_err("wire keys are not attributes");
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    }

    #[test]
    fn fetch_member_uses_record_id_and_default_unit() {
        let record: Value = serde_json::from_str(MEMBER_FIXTURE).expect("member fixture");
        let api = StubApi {
            unit_id: Some(131913),
            record: record.clone(),
            calls: RefCell::new(Vec::new()),
        };
        let row = SearchResult::from_json(&fixture()).expect("decode");

        let member = row.fetch_member(&api).expect("fetch");
        assert_eq!(member, Member::from_json(&record).expect("decode fixture"));
        assert_eq!(api.calls.borrow().as_slice(), &[(220695, 131913)]);
    }

    #[test]
    fn fetch_member_requires_id_and_unit() {
        let api = StubApi {
            unit_id: None,
            record: Value::Null,
            calls: RefCell::new(Vec::new()),
        };
        let row = SearchResult::from_json(&fixture()).expect("decode");
        let err = row.fetch_member(&api).expect_err("no unit");
        assert_eq!(err.kind(), ErrorKind::Usage);

        let err = SearchResult::default()
            .fetch_member(&api)
            .expect_err("no id");
        assert_eq!(err.field(), Some("id"));
        assert!(api.calls.borrow().is_empty());
    }

    #[test]
    fn display_uses_descriptor() {
        let row = SearchResult::from_json(&fixture()).expect("decode");
        assert_eq!(row.to_string(), r#"SearchResult("Brandt, Lena")"#);
    }
}
