//! Purpose: Codec and projections for a complete member record.
//! Exports: `Member`.
//! Role: Decoded from record GET responses; encoded as the PUT body on update.
//! Invariants: Wire keys match attribute names 1:1; `kontoverbindung` is a nested object.
use super::codec::record_codec;
use super::view::{self, View};
use crate::api::RecordApi;
use crate::core::datetime::DateTimeValue;
use crate::core::error::{Error, ErrorKind};
use serde_json::{Map, Value};
use std::fmt;

record_codec! {
    /// Full member record as served by the per-record endpoint.
    pub struct Member {
        austritts_datum: DateTimeValue => "austrittsDatum" as "austrittsDatum",
        beitragsart: String => "beitragsart" as "beitragsart",
        beitragsart_id: i64 => "beitragsartId" as "beitragsartId",
        eintrittsdatum: DateTimeValue => "eintrittsdatum" as "eintrittsdatum",
        email: String => "email" as "email",
        email_vertretungsberechtigter: String
            => "emailVertretungsberechtigter" as "emailVertretungsberechtigter",
        erste_taetigkeit: String => "ersteTaetigkeit" as "ersteTaetigkeit",
        erste_taetigkeit_id: i64 => "ersteTaetigkeitId" as "ersteTaetigkeitId",
        erste_untergliederung: String => "ersteUntergliederung" as "ersteUntergliederung",
        erste_untergliederung_id: i64 => "ersteUntergliederungId" as "ersteUntergliederungId",
        fix_beitrag: String => "fixBeitrag" as "fixBeitrag",
        geburts_datum: DateTimeValue => "geburtsDatum" as "geburtsDatum",
        generic_field1: String => "genericField1" as "genericField1",
        generic_field2: String => "genericField2" as "genericField2",
        geschlecht: String => "geschlecht" as "geschlecht",
        geschlecht_id: i64 => "geschlechtId" as "geschlechtId",
        gruppierung: String => "gruppierung" as "gruppierung",
        gruppierung_id: i64 => "gruppierungId" as "gruppierungId",
        id: i64 => "id" as "id",
        jungpfadfinder: String => "jungpfadfinder" as "jungpfadfinder",
        konfession: String => "konfession" as "konfession",
        konfession_id: i64 => "konfessionId" as "konfessionId",
        kontoverbindung: Map<String, Value> => "kontoverbindung" as "kontoverbindung",
        land: String => "land" as "land",
        land_id: i64 => "landId" as "landId",
        last_updated: DateTimeValue => "lastUpdated" as "lastUpdated",
        mgl_type: String => "mglType" as "mglType",
        mgl_type_id: String => "mglTypeId" as "mglTypeId",
        mitglieds_nummer: i64 => "mitgliedsNummer" as "mitgliedsNummer",
        nachname: String => "nachname" as "nachname",
        name_zusatz: String => "nameZusatz" as "nameZusatz",
        ort: String => "ort" as "ort",
        pfadfinder: String => "pfadfinder" as "pfadfinder",
        plz: String => "plz" as "plz",
        region: String => "region" as "region",
        region_id: i64 => "regionId" as "regionId",
        rover: String => "rover" as "rover",
        sonst01: bool => "sonst01" as "sonst01",
        sonst02: bool => "sonst02" as "sonst02",
        spitzname: String => "spitzname" as "spitzname",
        staatsangehoerigkeit: String => "staatsangehoerigkeit" as "staatsangehoerigkeit",
        staatsangehoerigkeit_id: i64 => "staatsangehoerigkeitId" as "staatsangehoerigkeitId",
        staatsangehoerigkeit_text: String
            => "staatsangehoerigkeitText" as "staatsangehoerigkeitText",
        status: String => "status" as "status",
        strasse: String => "strasse" as "strasse",
        stufe: String => "stufe" as "stufe",
        telefax: String => "telefax" as "telefax",
        telefon1: String => "telefon1" as "telefon1",
        telefon2: String => "telefon2" as "telefon2",
        telefon3: String => "telefon3" as "telefon3",
        version: i64 => "version" as "version",
        vorname: String => "vorname" as "vorname",
        wiederverwenden_flag: bool => "wiederverwendenFlag" as "wiederverwendenFlag",
        woelfling: String => "woelfling" as "woelfling",
        zeitschriftenversand: bool => "zeitschriftenversand" as "zeitschriftenversand",
    }
}

impl Member {
    pub const FULL_VIEW_DENY_LIST: &'static [&'static str] = &["genericField1"];

    pub const DEFAULT_SUMMARY_FIELDS: &'static [&'static str] = &[
        "mitgliedsNummer",
        "vorname",
        "nachname",
        "geburtsDatum",
        "strasse",
        "stufe",
    ];

    pub fn full_view(&self) -> View {
        view::full_view(self.view_entries(), Self::FULL_VIEW_DENY_LIST)
    }

    pub fn summary_view(&self, names: &[&str]) -> Result<View, Error> {
        view::summary_view(self.view_entries(), names)
    }

    pub fn summary(&self) -> Result<View, Error> {
        self.summary_view(Self::DEFAULT_SUMMARY_FIELDS)
    }

    /// Writes this record back under the api's default unit and returns the echoed data.
    pub fn update(&self, api: &impl RecordApi) -> Result<Value, Error> {
        let id = self.id.ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message("member record carries no id")
                .with_field("id")
        })?;
        let unit_id = api.require_default_unit()?;
        api.store_record(id, &self.to_json(), unit_id)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member({:?}, {:?})",
            self.nachname.as_deref().unwrap_or_default(),
            self.vorname.as_deref().unwrap_or_default()
        )
    }
}
