//! User-pinned segments and their persisted record form.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::defaults;
use crate::errors::{RecordError, SegmentError};
use crate::geometry::{axis_aligned_for_segment, points_close};
use crate::types::{Axis, Point};

/// A segment the user has pinned in place.
///
/// `index` is the segment's position in the point list: segment `i` joins
/// `points[i]` and `points[i + 1]`. The endpoints are always distinct and
/// share one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSegment {
    index: usize,
    start: Point,
    end: Point,
}

impl FixedSegment {
    pub fn new(index: usize, start: Point, end: Point) -> Result<Self, SegmentError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SegmentError::NonFinite);
        }
        if points_close(start, end, defaults::EPSILON) {
            return Err(SegmentError::ZeroLength);
        }
        if axis_aligned_for_segment(start, end, defaults::EPSILON).is_none() {
            return Err(SegmentError::Diagonal);
        }
        Ok(Self { index, start, end })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn axis(&self) -> Axis {
        axis_aligned_for_segment(self.start, self.end, defaults::EPSILON).unwrap_or(Axis::Horizontal)
    }

    /// The coordinate shared by both endpoints (`y` for a horizontal segment)
    pub fn offset(&self) -> f64 {
        self.start.along(self.axis().perpendicular())
    }

    /// Same endpoints at a different position in the point list
    pub fn with_index(self, index: usize) -> Self {
        Self { index, ..self }
    }

    /// Whether `a`-`b` is this segment, within `eps`
    pub fn matches(&self, a: Point, b: Point, eps: f64) -> bool {
        points_close(self.start, a, eps) && points_close(self.end, b, eps)
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("index".into(), json!(self.index));
        map.insert("start".into(), json!({ "x": self.start.x, "y": self.start.y }));
        map.insert("end".into(), json!({ "x": self.end.x, "y": self.end.y }));
        map
    }

    /// Decode a record, failing on missing or malformed fields.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, RecordError> {
        let index = record.get("index").ok_or(RecordError::MissingField { field: "index" })?;
        let index = index
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| RecordError::InvalidIndex { value: index.to_string() })?;
        let start = read_point(record, "start", ["start.x", "start.y"])?;
        let end = read_point(record, "end", ["end.x", "end.y"])?;
        Ok(Self::new(index, start, end)?)
    }
}

fn read_point(
    record: &Map<String, Value>,
    field: &'static str,
    coords: [&'static str; 2],
) -> Result<Point, RecordError> {
    let value = record.get(field).ok_or(RecordError::MissingField { field })?;
    let read = |key: &str, name: &'static str| {
        value
            .get(key)
            .ok_or(RecordError::MissingField { field: name })?
            .as_f64()
            .ok_or(RecordError::NotNumeric { field: name })
    };
    Ok(Point::new(read("x", coords[0])?, read("y", coords[1])?))
}

impl Serialize for FixedSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FixedSegment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::<String, Value>::deserialize(deserializer)?;
        FixedSegment::from_record(&record).map_err(D::Error::custom)
    }
}

/// Encode a whole pin list as a JSON array of records
pub fn fixed_segments_to_json(segments: &[FixedSegment]) -> String {
    Value::Array(segments.iter().map(|s| Value::Object(s.to_record())).collect()).to_string()
}

/// Decode a JSON array of records; any malformed record fails the whole list.
pub fn fixed_segments_from_json(text: &str) -> Result<Vec<FixedSegment>, RecordError> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(RecordError::NotAList);
    };
    items
        .iter()
        .map(|item| item.as_object().ok_or(RecordError::NotAnObject).and_then(FixedSegment::from_record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin() -> FixedSegment {
        FixedSegment::new(1, Point::new(50.0, 0.0), Point::new(50.0, 50.0)).unwrap()
    }

    fn record(text: &str) -> Map<String, Value> {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn new_enforces_invariants() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(FixedSegment::new(1, p, p), Err(SegmentError::ZeroLength));
        assert_eq!(FixedSegment::new(1, p, Point::new(5.0, 5.0)), Err(SegmentError::Diagonal));
        assert_eq!(FixedSegment::new(1, p, Point::new(f64::NAN, 1.0)), Err(SegmentError::NonFinite));
        assert_eq!(pin().axis(), Axis::Vertical);
        assert_eq!(pin().offset(), 50.0);
    }

    #[test]
    fn record_json_form() {
        let text = serde_json::to_string(&pin()).unwrap();
        insta::assert_snapshot!(text, @r#"{"end":{"x":50.0,"y":50.0},"index":1,"start":{"x":50.0,"y":0.0}}"#);
    }

    #[test]
    fn record_round_trip() {
        assert_eq!(FixedSegment::from_record(&pin().to_record()).unwrap(), pin());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = FixedSegment::from_record(&record(r#"{"start":{"x":0,"y":0},"end":{"x":0,"y":5}}"#)).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { field: "index" }));

        let err = FixedSegment::from_record(&record(r#"{"index":1,"end":{"x":0,"y":5}}"#)).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { field: "start" }));

        let err = FixedSegment::from_record(&record(r#"{"index":1,"start":{"x":0,"y":0},"end":{"y":5}}"#)).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { field: "end.x" }));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let bad = record(r#"{"index":1,"start":{"x":"0","y":0},"end":{"x":0,"y":5}}"#);
        let err = FixedSegment::from_record(&bad).unwrap_err();
        assert!(matches!(err, RecordError::NotNumeric { field: "start.x" }));

        let bad = record(r#"{"index":-1,"start":{"x":0,"y":0},"end":{"x":0,"y":5}}"#);
        let err = FixedSegment::from_record(&bad).unwrap_err();
        assert!(matches!(err, RecordError::InvalidIndex { .. }));

        let bad = record(r#"{"index":1.5,"start":{"x":0,"y":0},"end":{"x":0,"y":5}}"#);
        let err = FixedSegment::from_record(&bad).unwrap_err();
        assert!(matches!(err, RecordError::InvalidIndex { .. }));

        let bad = record(r#"{"index":1,"start":{"x":0,"y":0},"end":{"x":5,"y":5}}"#);
        let err = FixedSegment::from_record(&bad).unwrap_err();
        assert!(matches!(err, RecordError::Segment(SegmentError::Diagonal)));
    }

    #[test]
    fn serde_deserialize_fails_loudly() {
        assert!(serde_json::from_str::<FixedSegment>(r#"{"index":1}"#).is_err());
        let text = r#"{"index":2,"start":{"x":0,"y":10},"end":{"x":40,"y":10}}"#;
        let seg: FixedSegment = serde_json::from_str(text).unwrap();
        assert_eq!(seg.index(), 2);
        assert_eq!(seg.axis(), Axis::Horizontal);
    }

    #[test]
    fn list_helpers() {
        let text = fixed_segments_to_json(&[pin()]);
        assert_eq!(fixed_segments_from_json(&text).unwrap(), vec![pin()]);
        assert!(matches!(fixed_segments_from_json("{}"), Err(RecordError::NotAList)));
        assert!(matches!(fixed_segments_from_json("[1]"), Err(RecordError::NotAnObject)));
        assert!(matches!(fixed_segments_from_json("[nope"), Err(RecordError::Json(_))));
    }
}
