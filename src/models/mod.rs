mod program;
mod reference;

pub use program::{Program, VideoPage, VideoSchool, VideoSport};
pub use reference::{ReferenceEntry, School, SchoolsData, Sport, SportsData};
