use super::published::Warp;

/// Every parameter the engine publishes, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineParam {
    Voices,
    BendRange,
    ModCc,
    Unison,
    UnisonSpread,
    Rotate,
    Glide,
    Drift,
    Retrig,
    Cutoff,
    Resonance,
    KeyTrack,
    DelayTime,
    DelayFeedback,
    ReverbFeedback,
    ReverbDamping,
    ReverbMix,
    Level,
}

/// Static description of one engine parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub group: &'static str,
    pub lo: f32,
    pub hi: f32,
    pub interval: f32,
    pub warp: Warp,
    pub zero_threshold: f32,
    pub default: f32,
}

impl EngineParam {
    pub const COUNT: usize = 18;

    pub const ALL: [EngineParam; Self::COUNT] = [
        EngineParam::Voices,
        EngineParam::BendRange,
        EngineParam::ModCc,
        EngineParam::Unison,
        EngineParam::UnisonSpread,
        EngineParam::Rotate,
        EngineParam::Glide,
        EngineParam::Drift,
        EngineParam::Retrig,
        EngineParam::Cutoff,
        EngineParam::Resonance,
        EngineParam::KeyTrack,
        EngineParam::DelayTime,
        EngineParam::DelayFeedback,
        EngineParam::ReverbFeedback,
        EngineParam::ReverbDamping,
        EngineParam::ReverbMix,
        EngineParam::Level,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn spec(self) -> ParamSpec {
        use EngineParam::*;
        let (name, alias, group, lo, hi, interval, warp, zero_threshold, default) = match self {
            Voices => ("voices", Some("polyphony"), "voice", 1.0, 64.0, 1.0, Warp::Linear, -1.0, 8.0),
            BendRange => ("bend_range", Some("bend"), "voice", 0.0, 48.0, 1.0, Warp::Linear, -1.0, 2.0),
            ModCc => ("mod_cc", None, "voice", 1.0, 125.0, 1.0, Warp::Linear, -1.0, 1.0),
            Unison => ("unison", None, "voice", 0.0, 1.0, 1.0, Warp::Linear, -1.0, 0.0),
            UnisonSpread => ("unison_spread", Some("spread"), "voice", 0.0, 1.0, 0.01, Warp::Linear, -1.0, 0.1),
            Rotate => ("rotate", None, "voice", 0.0, 1.0, 1.0, Warp::Linear, -1.0, 0.0),
            Glide => ("glide", Some("portamento"), "voice", 0.0, 2.0, 0.001, Warp::Exp, 0.0, 0.0),
            Drift => ("drift", None, "voice", 0.0, 1.0, 0.01, Warp::Linear, -1.0, 0.0),
            Retrig => ("retrig", None, "voice", 0.0, 1.0, 1.0, Warp::Linear, -1.0, 0.0),
            Cutoff => ("cutoff", Some("freq"), "filter", 20.0, 20_000.0, 1.0, Warp::Exp, -1.0, 4_000.0),
            Resonance => ("resonance", Some("q"), "filter", 0.5, 12.0, 0.01, Warp::Exp, -1.0, 0.707),
            KeyTrack => ("key_track", None, "filter", 0.0, 1.0, 0.01, Warp::Linear, -1.0, 0.0),
            DelayTime => ("delay_time", None, "delay", 0.001, 1.0, 0.001, Warp::Exp, -1.0, 0.25),
            DelayFeedback => ("delay_feedback", None, "delay", 0.0, 0.95, 0.01, Warp::Linear, -1.0, 0.3),
            ReverbFeedback => ("reverb_feedback", Some("decay"), "reverb", 0.0, 0.98, 0.01, Warp::Linear, -1.0, 0.7),
            ReverbDamping => ("reverb_damping", None, "reverb", 500.0, 16_000.0, 1.0, Warp::Exp, -1.0, 6_000.0),
            ReverbMix => ("reverb_mix", Some("wet"), "reverb", 0.0, 1.0, 0.01, Warp::Linear, -1.0, 0.2),
            Level => ("level", Some("volume"), "output", 0.0, 1.0, 0.01, Warp::Linear, -1.0, 0.5),
        };
        ParamSpec {
            name,
            alias,
            group,
            lo,
            hi,
            interval,
            warp,
            zero_threshold,
            default,
        }
    }
}
