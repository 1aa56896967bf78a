//! Declarative cluster parameters and their validation.
//!
//! `ClusterParameters` mirrors the on-disk (JSON) shape: loose vectors that
//! may carry the wrong number of components. `validate()` is the only way to
//! get a `ValidParams`, and every later stage consumes the validated form, so
//! arity and finiteness errors surface before any placement or geometry call.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// The five named anchors of the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorName {
    Tr,
    Tl,
    Mr,
    Br,
    Bl,
}

impl AnchorName {
    pub const ALL: [AnchorName; 5] = [
        AnchorName::Tr,
        AnchorName::Tl,
        AnchorName::Mr,
        AnchorName::Br,
        AnchorName::Bl,
    ];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorName::Tr => "tr",
            AnchorName::Tl => "tl",
            AnchorName::Mr => "mr",
            AnchorName::Br => "br",
            AnchorName::Bl => "bl",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

impl fmt::Display for AnchorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-anchor pose parameters (degrees and millimetres).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorParam {
    pub rotation: Vec<f64>,
    pub position: Vec<f64>,
    /// In-plane plate/cap rotation about local Z, degrees.
    #[serde(default)]
    pub plate_rotation: f64,
}

impl AnchorParam {
    fn new(rotation: [f64; 3], position: [f64; 3]) -> Self {
        Self {
            rotation: rotation.to_vec(),
            position: position.to_vec(),
            plate_rotation: 0.0,
        }
    }
}

/// Cluster parameters as supplied by the caller. Defaults are the MINI cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParameters {
    /// Cluster origin relative to the main body's anchor point.
    pub origin_offset: Vec<f64>,
    /// Keyed by anchor name (`tr`, `tl`, `mr`, `br`, `bl`); all five required.
    pub anchors: BTreeMap<String, AnchorParam>,
    /// Fixed fastener offset from the cluster origin.
    pub screw_offset: Vec<f64>,
    pub screw_xy: Vec<Vec<f64>>,
    pub separable_screw_xy: Vec<Vec<f64>>,
}

impl Default for ClusterParameters {
    fn default() -> Self {
        let anchors = [
            (AnchorName::Tr, AnchorParam::new([14.0, -15.0, 10.0], [-15.0, -10.0, 5.0])),
            (AnchorName::Tl, AnchorParam::new([10.0, -23.0, 25.0], [-35.0, -16.0, -2.0])),
            (AnchorName::Mr, AnchorParam::new([10.0, -23.0, 25.0], [-23.0, -34.0, -6.0])),
            (AnchorName::Br, AnchorParam::new([6.0, -34.0, 35.0], [-39.0, -43.0, -16.0])),
            (AnchorName::Bl, AnchorParam::new([6.0, -32.0, 35.0], [-51.0, -25.0, -11.5])),
        ]
        .into_iter()
        .map(|(name, p)| (name.as_str().to_string(), p))
        .collect();
        Self {
            origin_offset: vec![6.0, -3.0, 7.0],
            anchors,
            screw_offset: vec![-29.0, -51.0, -16.0],
            screw_xy: vec![vec![-29.0, -52.0]],
            separable_screw_xy: vec![vec![-29.0, -52.0], vec![-62.0, 10.0], vec![12.0, -25.0]],
        }
    }
}

/// Validated pose of one anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorSpec {
    pub rotation: Vector3<f64>,
    pub position: Vector3<f64>,
    pub plate_rotation: f64,
}

/// Validated parameters; construct via `ClusterParameters::validate`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidParams {
    pub origin_offset: Vector3<f64>,
    anchors: [AnchorSpec; 5],
    pub screw_offset: Vector3<f64>,
    pub screw_xy: Vec<Vector2<f64>>,
    pub separable_screw_xy: Vec<Vector2<f64>>,
}

impl ValidParams {
    #[inline]
    pub fn anchor(&self, name: AnchorName) -> &AnchorSpec {
        &self.anchors[name.index()]
    }
}

impl ClusterParameters {
    /// Mutable access to one anchor's raw parameters, inserting a zero pose if absent.
    pub fn anchor_mut(&mut self, name: AnchorName) -> &mut AnchorParam {
        self.anchors
            .entry(name.as_str().to_string())
            .or_insert_with(|| AnchorParam::new([0.0; 3], [0.0; 3]))
    }

    /// Check arity and finiteness of every field and return the typed form.
    pub fn validate(&self) -> Result<ValidParams> {
        let origin_offset = vec3("origin_offset", &self.origin_offset)?;
        let screw_offset = vec3("screw_offset", &self.screw_offset)?;

        for key in self.anchors.keys() {
            if AnchorName::parse(key).is_none() {
                return Err(ClusterError::config(
                    format!("anchors.{key}"),
                    "unknown anchor (expected one of tr, tl, mr, br, bl)",
                ));
            }
        }
        let mut anchors = [AnchorSpec {
            rotation: Vector3::zeros(),
            position: Vector3::zeros(),
            plate_rotation: 0.0,
        }; 5];
        for name in AnchorName::ALL {
            let raw = self
                .anchors
                .get(name.as_str())
                .ok_or_else(|| ClusterError::config(format!("anchors.{name}"), "missing anchor entry"))?;
            let rotation = vec3(&format!("anchors.{name}.rotation"), &raw.rotation)?;
            let position = vec3(&format!("anchors.{name}.position"), &raw.position)?;
            if !raw.plate_rotation.is_finite() {
                return Err(ClusterError::config(
                    format!("anchors.{name}.plate_rotation"),
                    "must be finite",
                ));
            }
            anchors[name.index()] = AnchorSpec {
                rotation,
                position,
                plate_rotation: raw.plate_rotation,
            };
        }

        Ok(ValidParams {
            origin_offset,
            anchors,
            screw_offset,
            screw_xy: vec2_list("screw_xy", &self.screw_xy)?,
            separable_screw_xy: vec2_list("separable_screw_xy", &self.separable_screw_xy)?,
        })
    }
}

fn check_finite(field: &str, v: &[f64]) -> Result<()> {
    if let Some(i) = v.iter().position(|x| !x.is_finite()) {
        return Err(ClusterError::config(field, format!("component {i} is not finite")));
    }
    Ok(())
}

fn vec3(field: &str, v: &[f64]) -> Result<Vector3<f64>> {
    if v.len() != 3 {
        return Err(ClusterError::config(
            field,
            format!("expected 3 components, got {}", v.len()),
        ));
    }
    check_finite(field, v)?;
    Ok(Vector3::new(v[0], v[1], v[2]))
}

fn vec2_list(field: &str, vs: &[Vec<f64>]) -> Result<Vec<Vector2<f64>>> {
    vs.iter()
        .enumerate()
        .map(|(i, v)| {
            let name = format!("{field}[{i}]");
            if v.len() != 2 {
                return Err(ClusterError::config(
                    name,
                    format!("expected 2 components, got {}", v.len()),
                ));
            }
            check_finite(&name, v)?;
            Ok(Vector2::new(v[0], v[1]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let p = ClusterParameters::default().validate().unwrap();
        assert_eq!(p.origin_offset, Vector3::new(6.0, -3.0, 7.0));
        assert_eq!(p.anchor(AnchorName::Bl).position, Vector3::new(-51.0, -25.0, -11.5));
        assert_eq!(p.separable_screw_xy.len(), 3);
    }

    #[test]
    fn wrong_arity_names_the_field() {
        let mut raw = ClusterParameters::default();
        raw.anchor_mut(AnchorName::Mr).position = vec![1.0, 2.0];
        let err = raw.validate().unwrap_err();
        assert_eq!(
            err,
            ClusterError::config("anchors.mr.position", "expected 3 components, got 2")
        );

        let mut raw = ClusterParameters::default();
        raw.origin_offset.push(0.0);
        assert!(matches!(
            raw.validate(),
            Err(ClusterError::Configuration { field, .. }) if field == "origin_offset"
        ));
    }

    #[test]
    fn missing_and_unknown_anchors_are_rejected() {
        let mut raw = ClusterParameters::default();
        raw.anchors.remove("br");
        assert!(matches!(
            raw.validate(),
            Err(ClusterError::Configuration { field, .. }) if field == "anchors.br"
        ));

        let mut raw = ClusterParameters::default();
        raw.anchors.insert("ml".into(), AnchorParam::new([0.0; 3], [0.0; 3]));
        assert!(raw.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn non_finite_and_bad_screw_pairs_are_rejected() {
        let mut raw = ClusterParameters::default();
        raw.anchor_mut(AnchorName::Tl).rotation[1] = f64::NAN;
        assert!(raw.validate().unwrap_err().is_configuration());

        let mut raw = ClusterParameters::default();
        raw.screw_xy.push(vec![1.0]);
        assert!(matches!(
            raw.validate(),
            Err(ClusterError::Configuration { field, .. }) if field == "screw_xy[1]"
        ));
    }

    #[test]
    fn json_partial_overrides_keep_defaults() {
        let json = r#"{ "origin_offset": [1.0, 2.0, 3.0] }"#;
        let raw: ClusterParameters = serde_json::from_str(json).unwrap();
        assert_eq!(raw.origin_offset, vec![1.0, 2.0, 3.0]);
        assert_eq!(raw.anchors, ClusterParameters::default().anchors);

        let text = serde_json::to_string(&ClusterParameters::default()).unwrap();
        let back: ClusterParameters = serde_json::from_str(&text).unwrap();
        assert_eq!(back, ClusterParameters::default());
    }
}
