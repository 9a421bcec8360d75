//! 処方度数の入力
//!
//! - parse_prescription_text: "SPH -2.75 CYL -0.50 AXIS 180 PD 64" 形式の文字列を解析
//! - review_interactive: 読み取った値を対話式で確認・修正

use crate::error::{AdvisorError, Result};
use dialoguer::{Confirm, Input};
use eyewear_advisor_common::PrescriptionProfile;
use regex::Regex;

fn capture_number(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].to_string())
}

fn parse_diopter(label: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| AdvisorError::InvalidPrescription(format!("{} が数値ではありません: {}", label, raw)))?;
    if !value.is_finite() {
        return Err(AdvisorError::InvalidPrescription(format!("{} が不正です: {}", label, raw)));
    }
    Ok(value)
}

/// 処方度数の文字列を解析
///
/// ラベルは大文字小文字を問わず、区切りは空白・コロン・イコールを許容する。
/// 見つからない項目は既定値（SPH/CYL/AXIS は 0、PD は 63mm）。
///
/// # Examples
/// ```
/// use eyewear_advisor::prescription::parse_prescription_text;
///
/// let rx = parse_prescription_text("SPH: -2.75, CYL -0.50, AXIS 180, PD 64").unwrap();
/// assert_eq!(rx.sphere, -2.75);
/// assert_eq!(rx.axis, 180);
/// ```
pub fn parse_prescription_text(text: &str) -> Result<PrescriptionProfile> {
    lazy_static::lazy_static! {
        static ref SPH_RE: Regex = Regex::new(r"(?i)\b(?:sph|sphere)\b\s*[:=]?\s*([+-]?\d+(?:\.\d+)?)").unwrap();
        static ref CYL_RE: Regex = Regex::new(r"(?i)\b(?:cyl|cylinder)\b\s*[:=]?\s*([+-]?\d+(?:\.\d+)?)").unwrap();
        static ref AXIS_RE: Regex = Regex::new(r"(?i)\b(?:axis|ax)\b\s*[:=]?\s*(\d+)").unwrap();
        static ref PD_RE: Regex = Regex::new(r"(?i)\bpd\b\s*[:=]?\s*(\d+(?:\.\d+)?)").unwrap();
        static ref ADD_RE: Regex = Regex::new(r"(?i)\badd\b\s*[:=]?\s*([+-]?\d+(?:\.\d+)?)").unwrap();
    }

    let sphere_raw = capture_number(&SPH_RE, text);
    let cylinder_raw = capture_number(&CYL_RE, text);
    if sphere_raw.is_none() && cylinder_raw.is_none() {
        return Err(AdvisorError::InvalidPrescription(format!(
            "SPH または CYL が見つかりません: {}",
            text
        )));
    }

    let mut profile = PrescriptionProfile::default();

    if let Some(raw) = sphere_raw {
        profile.sphere = parse_diopter("SPH", &raw)?;
    }
    if let Some(raw) = cylinder_raw {
        profile.cylinder = parse_diopter("CYL", &raw)?;
    }
    if let Some(raw) = capture_number(&AXIS_RE, text) {
        profile.axis = parse_axis(&raw)?;
    }
    if let Some(raw) = capture_number(&PD_RE, text) {
        let pd = parse_diopter("PD", &raw)?;
        if pd <= 0.0 || pd >= f64::from(u16::MAX) {
            return Err(AdvisorError::InvalidPrescription(format!("PD が不正です: {}", raw)));
        }
        profile.pupillary_distance = pd.round() as u16;
    }
    if let Some(raw) = capture_number(&ADD_RE, text) {
        profile.add = Some(parse_diopter("ADD", &raw)?);
    }

    Ok(profile)
}

fn parse_axis(raw: &str) -> Result<u16> {
    match raw.parse::<u16>() {
        Ok(axis) if axis <= PrescriptionProfile::MAX_AXIS => Ok(axis),
        _ => Err(AdvisorError::InvalidPrescription(format!(
            "AXIS は 0〜180 で指定してください: {}",
            raw
        ))),
    }
}

/// 確認画面で修正された値を反映（入力値は丸めずにそのまま使う）
pub fn apply_corrections(
    profile: PrescriptionProfile,
    sphere: f64,
    cylinder: f64,
    axis: u16,
    pupillary_distance: u16,
) -> PrescriptionProfile {
    PrescriptionProfile {
        sphere,
        cylinder,
        axis,
        pupillary_distance,
        ..profile
    }
}

/// 読み取った値を対話式で確認・修正
pub fn review_interactive(profile: PrescriptionProfile) -> Result<PrescriptionProfile> {
    println!("読み取った処方度数: {}", profile);

    let ok = Confirm::new()
        .with_prompt("この値で提案を表示しますか？")
        .default(true)
        .interact()?;
    if ok {
        return Ok(profile);
    }

    let sphere: f64 = Input::new()
        .with_prompt("SPHERE (SPH)")
        .default(profile.sphere)
        .validate_with(|v: &f64| if v.is_finite() { Ok(()) } else { Err("数値を入力してください") })
        .interact_text()?;

    let cylinder: f64 = Input::new()
        .with_prompt("CYLINDER (CYL)")
        .default(profile.cylinder)
        .validate_with(|v: &f64| if v.is_finite() { Ok(()) } else { Err("数値を入力してください") })
        .interact_text()?;

    let axis: u16 = Input::new()
        .with_prompt("AXIS")
        .default(profile.axis)
        .validate_with(|v: &u16| {
            if *v <= PrescriptionProfile::MAX_AXIS {
                Ok(())
            } else {
                Err("0〜180 で入力してください")
            }
        })
        .interact_text()?;

    let pupillary_distance: u16 = Input::new()
        .with_prompt("PD (PUPIL DIST)")
        .default(profile.pupillary_distance)
        .interact_text()?;

    Ok(apply_corrections(profile, sphere, cylinder, axis, pupillary_distance))
}
