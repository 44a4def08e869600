//! Mock feed payloads shared by the integration tests.

#![allow(dead_code)]

use snow_server::cache::{CachedFmiClient, ObservationCache};
use snow_server::domain::StationId;
use snow_server::fmi::{FmiClient, FmiConfig};
use wiremock::{MockServer, ResponseTemplate};

pub const DAILY: &str = "fmi::observations::weather::daily::simple";
pub const LATEST: &str = "fmi::observations::weather::simple";
pub const HOURLY: &str = "fmi::observations::weather::hourly::simple";

/// One `BsWfsElement`; `None` leaves the child element empty.
pub fn element(time: Option<&str>, parameter: &str, value: Option<&str>) -> String {
    format!(
        "<wfs:member>\
         <BsWfs:BsWfsElement gml:id=\"BsWfsElement.1\">\
         <BsWfs:Location><gml:Point><gml:pos>67.97 24.11</gml:pos></gml:Point></BsWfs:Location>\
         <BsWfs:Time>{}</BsWfs:Time>\
         <BsWfs:ParameterName>{}</BsWfs:ParameterName>\
         <BsWfs:ParameterValue>{}</BsWfs:ParameterValue>\
         </BsWfs:BsWfsElement>\
         </wfs:member>",
        time.unwrap_or(""),
        parameter,
        value.unwrap_or("")
    )
}

pub fn document(elements: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <wfs:FeatureCollection timeStamp=\"2024-01-15T12:00:00Z\" numberMatched=\"{n}\" numberReturned=\"{n}\" \
         xmlns:wfs=\"http://www.opengis.net/wfs/2.0\" \
         xmlns:gml=\"http://www.opengis.net/gml/3.2\" \
         xmlns:BsWfs=\"http://xml.fmi.fi/schema/wfs/2.0\">\n{body}\n</wfs:FeatureCollection>",
        n = elements.len(),
        body = elements.join("\n")
    )
}

pub fn daily_document() -> String {
    document(&[
        element(Some("2024-01-13T00:00:00Z"), "snow", Some("30.0")),
        element(Some("2024-01-13T00:00:00Z"), "tday", Some("-4.1")),
        element(Some("2024-01-14T00:00:00Z"), "snow", Some("32.0")),
        element(Some("2024-01-14T00:00:00Z"), "tday", None),
        element(Some("2024-01-15T00:00:00Z"), "snow", Some("34.0")),
        element(Some("2024-01-15T00:00:00Z"), "tday", Some("-7.5")),
    ])
}

pub fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml; charset=UTF-8")
        .set_body_string(body)
}

pub fn station(id: &str) -> StationId {
    StationId::parse(id).unwrap()
}

pub fn cached_client(server: &MockServer) -> CachedFmiClient {
    let config = FmiConfig::default().with_base_url(format!("{}/wfs", server.uri()));
    let client = FmiClient::new(config).unwrap();
    CachedFmiClient::new(client, ObservationCache::new())
}
