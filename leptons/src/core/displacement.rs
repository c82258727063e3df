//! Impact parameters of a candidate's track relative to the event's
//! reference points.

use crate::core::error::{ModuleError, ModuleResult};
use crate::core::types::{BeamSpot, Point3, Track, Vertex};

/// Value stored for every displacement when the candidate has no track.
/// Out of physical range, so "no track" never reads as a near-zero displacement.
pub const NO_TRACK_SENTINEL: f64 = 10000.0;

/// Transverse and longitudinal displacement from one reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub dxy: f64,
    pub dz: f64,
}

impl Displacement {
    pub const NO_TRACK: Self = Self {
        dxy: NO_TRACK_SENTINEL,
        dz: NO_TRACK_SENTINEL,
    };

    pub fn of(track: &Track, reference: &Point3) -> Self {
        Self {
            dxy: track.dxy(reference),
            dz: track.dz(reference),
        }
    }
}

/// Reference points of one event.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePoints<'a> {
    pub beam_spot: &'a BeamSpot,
    pub primary_vertices: &'a [Vertex],
}

/// Displacements of one candidate from the beam spot and from the leading
/// primary vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateDisplacement {
    pub from_beam_spot: Displacement,
    pub from_primary_vertex: Displacement,
}

/// Compute both displacements for candidate number `candidate`.
///
/// Without a track both are [`Displacement::NO_TRACK`] and the vertex
/// collection is not consulted. With a track, the vertex collection must be
/// non-empty and the track must have non-zero transverse momentum.
pub fn candidate_displacement(
    candidate: usize,
    track: Option<&Track>,
    refs: ReferencePoints<'_>,
) -> ModuleResult<CandidateDisplacement> {
    let Some(track) = track else {
        return Ok(CandidateDisplacement {
            from_beam_spot: Displacement::NO_TRACK,
            from_primary_vertex: Displacement::NO_TRACK,
        });
    };
    if track.pt() == 0.0 {
        return Err(ModuleError::DegenerateTrack { candidate });
    }
    let leading = refs
        .primary_vertices
        .first()
        .ok_or(ModuleError::EmptyVertexCollection { candidate })?;
    Ok(CandidateDisplacement {
        from_beam_spot: Displacement::of(track, &refs.beam_spot.position),
        from_primary_vertex: Displacement::of(track, &leading.position),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Momentum;

    fn track() -> Track {
        Track {
            vertex: Point3::new(0.0, 0.02, 1.0),
            momentum: Momentum {
                px: 20.0,
                py: 0.0,
                pz: 10.0,
            },
        }
    }

    fn vertex(x: f64, y: f64, z: f64) -> Vertex {
        Vertex {
            position: Point3::new(x, y, z),
            ..Vertex::default()
        }
    }

    #[test]
    fn missing_track_yields_sentinel_without_vertices() {
        let beam_spot = BeamSpot::default();
        let refs = ReferencePoints {
            beam_spot: &beam_spot,
            primary_vertices: &[],
        };
        let d = candidate_displacement(0, None, refs).expect("displacement");
        assert_eq!(d.from_beam_spot, Displacement::NO_TRACK);
        assert_eq!(d.from_primary_vertex.dxy, 10000.0);
        assert_eq!(d.from_primary_vertex.dz, 10000.0);
    }

    #[test]
    fn uses_first_primary_vertex_only() {
        let beam_spot = BeamSpot::default();
        let vertices = [vertex(0.0, 0.0, 0.5), vertex(0.0, 0.0, -3.0)];
        let refs = ReferencePoints {
            beam_spot: &beam_spot,
            primary_vertices: &vertices,
        };
        let t = track();
        let d = candidate_displacement(0, Some(&t), refs).expect("displacement");
        assert_eq!(d.from_beam_spot, Displacement::of(&t, &beam_spot.position));
        assert_eq!(d.from_primary_vertex, Displacement::of(&t, &vertices[0].position));
        assert_eq!(d.from_beam_spot.dz, 1.0);
        assert_eq!(d.from_primary_vertex.dz, 0.5);
    }

    #[test]
    fn track_with_empty_vertices_is_an_error() {
        let beam_spot = BeamSpot::default();
        let refs = ReferencePoints {
            beam_spot: &beam_spot,
            primary_vertices: &[],
        };
        let err = candidate_displacement(3, Some(&track()), refs).expect_err("should fail");
        assert_eq!(err, ModuleError::EmptyVertexCollection { candidate: 3 });
    }

    #[test]
    fn zero_pt_track_is_an_error() {
        let beam_spot = BeamSpot::default();
        let vertices = [vertex(0.0, 0.0, 0.0)];
        let refs = ReferencePoints {
            beam_spot: &beam_spot,
            primary_vertices: &vertices,
        };
        let mut t = track();
        t.momentum.px = 0.0;
        let err = candidate_displacement(1, Some(&t), refs).expect_err("should fail");
        assert_eq!(err, ModuleError::DegenerateTrack { candidate: 1 });
    }
}
