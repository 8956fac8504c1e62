//! Names of the collections in the StudyCamp database.

/// College catalogue. Read-only from the API's point of view.
pub const COLLEGES: &str = "colleges";

/// Reserved for per-user college selections. No route reads or writes it yet.
pub const MY_COLLEGE: &str = "myCollege";

/// Candidate application submissions, append-only.
pub const CANDIDATE_COLLECTION: &str = "candidateCollection";
