pub mod gemini;
pub mod hashing;
pub mod openai;
pub mod voyage;
