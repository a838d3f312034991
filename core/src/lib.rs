pub mod combat_log;
pub mod context;
pub mod effects;
pub mod game_data;
pub mod session;

// Re-exports for convenience
pub use combat_log::{
    ActorId, DecodedHit, HitKind, HitQualifier, LogLine, Reader, ReaderError, parse_line,
};
pub use context::{AppConfig, ConfigError, DirectoryIndex, IStr, intern, resolve};
pub use effects::{MitigationInterval, MitigationTracker, reconstruct_attempt, reconstruct_hit};
pub use game_data::{HitType, MitigationInfo, MitigationKind, Role};
pub use session::{
    AbilityHit, Attempt, AttemptOutcome, DebuffApplication, DebuffSource, Entity, EntityRegistry,
    Fight, HeadMark, ParserState, PlayerDeath, RaidSession, SessionParser, SessionStats,
    apply_hit_type_overrides, parse_lines,
};
