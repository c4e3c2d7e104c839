pub mod request;
pub use request::{Difficulty, GenerateQuizRequest, SubmitAttemptInput};
