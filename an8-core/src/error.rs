use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, SceneError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Object \"{object}\" declares no morph target named \"{target}\"")]
    UnknownMorphTarget { object: String, target: String },
}
