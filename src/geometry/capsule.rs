use glam::{Mat4, Quat, Vec3};

use super::{GeometryError, ALIGN_TOLERANCE, MIN_CAPSULE_HEIGHT};

/// Intrinsic long axis of a capsule primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along +X.
    X,
    /// Along +Y.
    Y,
    /// Along +Z.
    Z,
}

impl Axis {
    /// Unit basis vector of this axis.
    #[must_use]
    pub fn basis(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Axis token as written into scene files.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }

    /// Axis whose basis vector has the largest absolute dot product with
    /// `dir`. Ties go to the earlier axis (X before Y before Z).
    #[must_use]
    pub fn closest_to(dir: Vec3) -> Self {
        let a = dir.abs();
        if a.x >= a.y && a.x >= a.z {
            Self::X
        } else if a.y >= a.z {
            Self::Y
        } else {
            Self::Z
        }
    }
}

/// Placement of one bond capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsulePose {
    /// Intrinsic long axis of the capsule.
    pub axis: Axis,
    /// Length of the capsule's cylindrical body.
    pub height: f32,
    /// Rotation taking the intrinsic axis onto the bond direction.
    pub orientation: Quat,
    /// Center of the capsule, halfway between the atom centers.
    pub midpoint: Vec3,
    /// Capsule radius.
    pub radius: f32,
}

impl CapsulePose {
    /// Local-to-parent transform: rotate, then translate to the midpoint.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.midpoint)
    }

    /// World-space bond direction (unit length).
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.orientation * self.axis.basis()
    }

    /// The two ends of the capsule body.
    #[must_use]
    pub fn endpoints(&self) -> [Vec3; 2] {
        let half = self.direction() * (self.height * 0.5);
        [self.midpoint - half, self.midpoint + half]
    }
}

fn check_radius(name: &'static str, value: f32) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidRadius { name, value })
    }
}

/// Resolve the capsule pose for a bond between atom centers `p0` and `p1`.
///
/// The capsule height is the center distance minus both sphere radii,
/// floored at [`MIN_CAPSULE_HEIGHT`]. Identical endpoints have no defined
/// direction and are rejected, as are endpoints so far apart that their
/// separation overflows `f32`.
pub fn resolve_bond_pose(
    p0: Vec3,
    p1: Vec3,
    atom_radius: f32,
    bond_radius: f32,
) -> Result<CapsulePose, GeometryError> {
    if !(p0.is_finite() && p1.is_finite()) {
        return Err(GeometryError::NonFinite);
    }
    check_radius("atom radius", atom_radius)?;
    check_radius("bond radius", bond_radius)?;

    let delta = p1 - p0;
    if delta == Vec3::ZERO {
        return Err(GeometryError::CoincidentAtoms { at: p0.to_array() });
    }
    if !delta.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    // Scale by the largest component first so tiny separations do not
    // underflow when squared.
    let scale = delta.abs().max_element();
    let unit = delta / scale;
    let unit_len = unit.length();
    let dir = unit / unit_len;
    let distance = scale * unit_len;
    if !distance.is_finite() {
        return Err(GeometryError::NonFinite);
    }

    let height = (distance - 2.0 * atom_radius).max(MIN_CAPSULE_HEIGHT);
    let axis = Axis::closest_to(dir);
    let basis = axis.basis();

    let orientation = if (dir - basis).abs().max_element() <= ALIGN_TOLERANCE
    {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(basis, dir)
    };

    Ok(CapsulePose {
        axis,
        height,
        orientation,
        midpoint: (p0 + p1) * 0.5,
        radius: bond_radius,
    })
}
