/*
[INPUT]:  Gateway protocol definitions and serde requirements
[OUTPUT]: Typed parameter, request and response structures
[POS]:    Data layer - type definitions for gateway communication
[UPDATE]: When protocol types are added or changed
*/

pub mod enums;
pub mod params;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use params::*;
pub use requests::*;
pub use responses::*;
