//! Face mesh landmark types and the index table shared by every feature
//! extractor.

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Number of points produced by a full face mesh (without iris refinement)
pub const FACE_MESH_LANDMARKS: usize = 468;

/// 2D landmark (image space or normalized)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 3D landmark as emitted by the face mesh model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Drop the depth component
    pub fn to_2d(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Component-wise midpoint
    pub fn midpoint(&self, other: &Point3D) -> Point3D {
        Point3D::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }
}

/// Named face mesh indices used by the geometry module.
///
/// Eye contour points are listed in EAR order: outer/inner corners at
/// positions 0 and 3, vertical pairs at (1, 5) and (2, 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceLandmark {
    NoseTip,
    Chin,
    LeftEyeOuter,
    LeftEyeUpperOuter,
    LeftEyeUpperInner,
    LeftEyeInner,
    LeftEyeLowerInner,
    LeftEyeLowerOuter,
    RightEyeInner,
    RightEyeUpperInner,
    RightEyeUpperOuter,
    RightEyeOuter,
    RightEyeLowerOuter,
    RightEyeLowerInner,
}

impl FaceLandmark {
    /// Every named landmark, used for the bounds check
    pub const ALL: [FaceLandmark; 14] = [
        FaceLandmark::NoseTip,
        FaceLandmark::Chin,
        FaceLandmark::LeftEyeOuter,
        FaceLandmark::LeftEyeUpperOuter,
        FaceLandmark::LeftEyeUpperInner,
        FaceLandmark::LeftEyeInner,
        FaceLandmark::LeftEyeLowerInner,
        FaceLandmark::LeftEyeLowerOuter,
        FaceLandmark::RightEyeInner,
        FaceLandmark::RightEyeUpperInner,
        FaceLandmark::RightEyeUpperOuter,
        FaceLandmark::RightEyeOuter,
        FaceLandmark::RightEyeLowerOuter,
        FaceLandmark::RightEyeLowerInner,
    ];

    /// Left eye contour in EAR order
    pub const LEFT_EYE: [FaceLandmark; 6] = [
        FaceLandmark::LeftEyeOuter,
        FaceLandmark::LeftEyeUpperOuter,
        FaceLandmark::LeftEyeUpperInner,
        FaceLandmark::LeftEyeInner,
        FaceLandmark::LeftEyeLowerInner,
        FaceLandmark::LeftEyeLowerOuter,
    ];

    /// Right eye contour in EAR order
    pub const RIGHT_EYE: [FaceLandmark; 6] = [
        FaceLandmark::RightEyeInner,
        FaceLandmark::RightEyeUpperInner,
        FaceLandmark::RightEyeUpperOuter,
        FaceLandmark::RightEyeOuter,
        FaceLandmark::RightEyeLowerOuter,
        FaceLandmark::RightEyeLowerInner,
    ];

    /// Position of this landmark in the face mesh output
    pub const fn index(self) -> usize {
        match self {
            FaceLandmark::NoseTip => 1,
            FaceLandmark::Chin => 152,
            FaceLandmark::LeftEyeOuter => 33,
            FaceLandmark::LeftEyeUpperOuter => 160,
            FaceLandmark::LeftEyeUpperInner => 158,
            FaceLandmark::LeftEyeInner => 133,
            FaceLandmark::LeftEyeLowerInner => 153,
            FaceLandmark::LeftEyeLowerOuter => 144,
            FaceLandmark::RightEyeInner => 362,
            FaceLandmark::RightEyeUpperInner => 385,
            FaceLandmark::RightEyeUpperOuter => 387,
            FaceLandmark::RightEyeOuter => 263,
            FaceLandmark::RightEyeLowerOuter => 373,
            FaceLandmark::RightEyeLowerInner => 380,
        }
    }
}

const fn max_index() -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < FaceLandmark::ALL.len() {
        let idx = FaceLandmark::ALL[i].index();
        if idx > max {
            max = idx;
        }
        i += 1;
    }
    max
}

/// Minimum landmark count for every lookup in the table to be in bounds
pub const REQUIRED_LANDMARKS: usize = max_index() + 1;

/// Landmarks of one detected face, length-checked on construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkSet {
    points: Vec<Point3D>,
}

impl LandmarkSet {
    /// Wrap a face mesh output, rejecting sets too short for the index table
    pub fn new(points: Vec<Point3D>) -> Result<Self, DmsError> {
        if points.len() < REQUIRED_LANDMARKS {
            return Err(DmsError::LandmarkCount {
                expected: REQUIRED_LANDMARKS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Look up a named landmark
    pub fn get(&self, landmark: FaceLandmark) -> Point3D {
        // In bounds: construction guarantees len >= REQUIRED_LANDMARKS
        self.points[landmark.index()]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }
}

impl TryFrom<Vec<Point3D>> for LandmarkSet {
    type Error = DmsError;

    fn try_from(points: Vec<Point3D>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

/// Six contour points of one eye in EAR order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarks(pub [Point2D; 6]);

impl EyeLandmarks {
    pub fn points(&self) -> &[Point2D; 6] {
        &self.0
    }
}
