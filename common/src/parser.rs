//! APIレスポンスパーサー
//!
//! 生成AIのレスポンスからJSONを抽出し、
//! フェイススキャン結果・処方度数をパースする

use crate::error::{Error, Result};
use crate::types::{FaceScanReport, PrescriptionProfile};
use serde::Deserialize;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト、または [...] 配列（先に現れた方）
/// 3. エラー
///
/// # Examples
/// ```
/// use eyewear_advisor_common::extract_json;
///
/// let response = "Result: {\"faceShape\": \"Oval\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"faceShape\": \"Oval\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    let object = response.find('{');
    let array = response.find('[');
    let (open, close) = match (object, array) {
        (Some(o), Some(a)) if a < o => ('[', ']'),
        (Some(_), _) => ('{', '}'),
        (None, Some(_)) => ('[', ']'),
        (None, None) => return Err(Error::Parse("JSONが見つかりません".into())),
    };

    if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
        if end >= start {
            return Ok(&response[start..=end]);
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// フェイススキャンのレスポンスをパース
///
/// 顔型が空のレスポンスは失敗として扱う（呼び出し側で代替結果に切り替える）
pub fn parse_face_scan_response(response: &str) -> Result<FaceScanReport> {
    let json_str = extract_json(response)?;
    let report: FaceScanReport = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("フェイススキャン JSONパースエラー: {}", e)))?;

    if report.face_shape.trim().is_empty() {
        return Err(Error::Parse("faceShape が空です".into()));
    }
    Ok(report)
}

/// 処方度数の生データ（モデルが整数項目を小数で返す場合に対応）
#[derive(Deserialize)]
struct RawPrescription {
    #[serde(alias = "sphere", default)]
    sph: f64,
    #[serde(alias = "cylinder", default)]
    cyl: f64,
    #[serde(default)]
    axis: f64,
    #[serde(alias = "pupillaryDistance")]
    pd: Option<f64>,
    #[serde(default)]
    add: Option<f64>,
}

/// 処方箋読み取りのレスポンスをパース
pub fn parse_prescription_response(response: &str) -> Result<PrescriptionProfile> {
    let json_str = extract_json(response)?;
    let raw: RawPrescription = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("処方箋 JSONパースエラー: {}", e)))?;

    if !raw.sph.is_finite() || !raw.cyl.is_finite() {
        return Err(Error::Parse("SPH/CYL が数値ではありません".into()));
    }

    let axis = raw.axis.round();
    if !(0.0..=f64::from(PrescriptionProfile::MAX_AXIS)).contains(&axis) {
        return Err(Error::Parse(format!("AXIS が範囲外です: {}", raw.axis)));
    }

    let pd = match raw.pd {
        Some(pd) if pd.is_finite() && pd > 0.0 && pd < f64::from(u16::MAX) => pd.round() as u16,
        Some(pd) => return Err(Error::Parse(format!("PD が不正です: {}", pd))),
        None => PrescriptionProfile::DEFAULT_PD,
    };

    Ok(PrescriptionProfile {
        sphere: raw.sph,
        cylinder: raw.cyl,
        axis: axis as u16,
        pupillary_distance: pd,
        add: raw.add.filter(|a| a.is_finite() && *a != 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the report:
```json
{"faceShape": "Heart"}
```
Thanks."#;
        assert_eq!(extract_json(response).unwrap(), r#"{"faceShape": "Heart"}"#);
    }

    #[test]
    fn test_extract_json_object_with_nested_array() {
        let response = r#"{"recommendations": [{"name": "A"}]}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_array_first() {
        let response = r#"List: [{"a": 1}, {"b": 2}] end"#;
        assert_eq!(extract_json(response).unwrap(), r#"[{"a": 1}, {"b": 2}]"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("JSONが見つかりません"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_extract_json_unbalanced() {
        assert!(extract_json("} only closing {").is_err());
    }

    // =============================================
    // parse_face_scan_response テスト
    // =============================================

    #[test]
    fn test_parse_face_scan_response() {
        let response = r#"{
            "faceShape": "Square",
            "measurements": {"pd": "62-66mm", "bridge": "17-19mm", "temple": "140-145mm"},
            "recommendations": [
                {"name": "Round Bohemian", "confidence": "96%", "status": "Perfect Match"}
            ],
            "fullReportText": "AI FACE SCAN SUGGEST REPORT",
            "whatsappReport": "My scan is ready"
        }"#;

        let report = parse_face_scan_response(response).unwrap();
        assert_eq!(report.face_shape, "Square");
        assert_eq!(report.measurements.bridge, "17-19mm");
        assert_eq!(report.recommendations[0].name, "Round Bohemian");
        assert_eq!(report.whatsapp_report, "My scan is ready");
    }

    #[test]
    fn test_parse_face_scan_missing_shape() {
        let result = parse_face_scan_response("{}");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_face_scan_invalid_json() {
        let result = parse_face_scan_response(r#"{"faceShape": }"#);
        assert!(matches!(result, Err(Error::Parse(msg)) if msg.contains("フェイススキャン")));
    }

    // =============================================
    // parse_prescription_response テスト
    // =============================================

    #[test]
    fn test_parse_prescription() {
        let rx = parse_prescription_response(r#"{"sph": -2.75, "cyl": -0.5, "axis": 180, "pd": 64}"#).unwrap();
        assert_eq!(rx, PrescriptionProfile::sample_reading());
    }

    #[test]
    fn test_parse_prescription_float_integers() {
        let rx = parse_prescription_response(r#"{"sph": 1.25, "cyl": 0, "axis": 90.0, "pd": 61.6}"#).unwrap();
        assert_eq!(rx.axis, 90);
        assert_eq!(rx.pupillary_distance, 62);
        assert_eq!(rx.add, None);
    }

    #[test]
    fn test_parse_prescription_defaults() {
        let rx = parse_prescription_response(r#"```json
{"sph": -1.0}
```"#)
        .unwrap();
        assert_eq!(rx.cylinder, 0.0);
        assert_eq!(rx.pupillary_distance, 63);
    }

    #[test]
    fn test_parse_prescription_axis_out_of_range() {
        let result = parse_prescription_response(r#"{"sph": -1.0, "axis": 270}"#);
        assert!(matches!(result, Err(Error::Parse(msg)) if msg.contains("AXIS")));
    }

    #[test]
    fn test_parse_prescription_with_add() {
        let rx = parse_prescription_response(r#"{"sphere": 0.5, "add": 1.75}"#).unwrap();
        assert_eq!(rx.sphere, 0.5);
        assert_eq!(rx.add, Some(1.75));
    }
}
