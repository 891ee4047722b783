//! Report projections: one tracking record per occurrence, later filled in
//! with the measured pickup weight.

mod projection;

pub use projection::ReportProjection;
