//! Declarative property animations sampled against a clock.
//!
//! Times passed to `value_at` are local to the animation: seconds since the
//! animation was added to its layer. `None` means the animation is not
//! active at that instant and the property shows its model value.

use std::f64::consts::TAU;

/// Animatable properties of a stroke shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPath {
    StrokeStart,
    StrokeEnd,
    RotationZ,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    Once,
    Forever,
}

impl Repeat {
    fn wrap(self, t: f64, period: f64) -> Option<f64> {
        if t < 0.0 || period <= 0.0 {
            return None;
        }
        match self {
            Repeat::Once if t >= period => None,
            Repeat::Once => Some(t),
            Repeat::Forever => Some(t.rem_euclid(period)),
        }
    }
}

/// Linear interpolation from one value to another.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicAnimation {
    pub key_path: KeyPath,
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    pub repeat: Repeat,
}

impl BasicAnimation {
    /// Full turn about the z axis.
    pub fn rotation(duration: f64) -> Self {
        Self {
            key_path: KeyPath::RotationZ,
            from: 0.0,
            to: TAU,
            duration,
            repeat: Repeat::Forever,
        }
    }

    pub fn value_at(&self, t: f64) -> Option<f64> {
        let t = self.repeat.wrap(t, self.duration)?;
        let progress = t / self.duration;
        Some(self.from + (self.to - self.from) * progress)
    }
}

/// Piecewise-linear animation through evenly spaced key values, optionally
/// delayed by `begin_time` inside its parent group.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeAnimation {
    pub key_path: KeyPath,
    pub values: Vec<f64>,
    pub begin_time: f64,
    pub duration: f64,
}

impl KeyframeAnimation {
    pub fn new(key_path: KeyPath, values: Vec<f64>, duration: f64) -> Self {
        Self {
            key_path,
            values,
            begin_time: 0.0,
            duration,
        }
    }

    pub fn with_begin_time(mut self, begin_time: f64) -> Self {
        self.begin_time = begin_time;
        self
    }

    pub fn value_at(&self, t: f64) -> Option<f64> {
        let t = Repeat::Once.wrap(t - self.begin_time, self.duration)?;
        match self.values.len() {
            0 => None,
            1 => Some(self.values[0]),
            n => {
                let segments = (n - 1) as f64;
                let position = (t / self.duration) * segments;
                let index = (position.floor() as usize).min(n - 2);
                let local = position - index as f64;
                let a = self.values[index];
                let b = self.values[index + 1];
                Some(a + (b - a) * local)
            }
        }
    }
}

/// A set of keyframe animations sharing one repeating cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationGroup {
    pub animations: Vec<KeyframeAnimation>,
    pub duration: f64,
    pub repeat: Repeat,
}

impl AnimationGroup {
    pub fn value_at(&self, key_path: KeyPath, t: f64) -> Option<f64> {
        let t = self.repeat.wrap(t, self.duration)?;
        self.animations
            .iter()
            .filter(|a| a.key_path == key_path)
            .find_map(|a| a.value_at(t))
    }
}

/// Any animation a layer can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Basic(BasicAnimation),
    Group(AnimationGroup),
}

impl Animation {
    pub fn value_at(&self, key_path: KeyPath, t: f64) -> Option<f64> {
        match self {
            Animation::Basic(a) if a.key_path == key_path => a.value_at(t),
            Animation::Basic(_) => None,
            Animation::Group(g) => g.value_at(key_path, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotation_wraps_every_cycle() {
        let rot = BasicAnimation::rotation(1.5);
        assert!(close(rot.value_at(0.0).unwrap(), 0.0));
        assert!(close(rot.value_at(0.75).unwrap(), TAU / 2.0));
        assert!(close(rot.value_at(1.5).unwrap(), 0.0));
        assert!(close(rot.value_at(3.0 + 0.375).unwrap(), TAU / 4.0));
    }

    #[test]
    fn test_keyframes_interpolate_between_even_key_times() {
        let anim = KeyframeAnimation::new(KeyPath::StrokeStart, vec![0.0, 0.8, 1.0], 1.0);
        assert!(close(anim.value_at(0.0).unwrap(), 0.0));
        assert!(close(anim.value_at(0.25).unwrap(), 0.4));
        assert!(close(anim.value_at(0.5).unwrap(), 0.8));
        assert!(close(anim.value_at(0.75).unwrap(), 0.9));
        assert_eq!(anim.value_at(1.0), None);
    }

    #[test]
    fn test_keyframe_begin_time_delays_activation() {
        let anim = KeyframeAnimation::new(KeyPath::StrokeEnd, vec![0.0, 1.0], 1.0)
            .with_begin_time(0.5);
        assert_eq!(anim.value_at(0.25), None);
        assert!(close(anim.value_at(1.0).unwrap(), 0.5));
        assert_eq!(anim.value_at(1.5), None);
    }

    #[test]
    fn test_group_filters_by_key_path() {
        let group = AnimationGroup {
            animations: vec![
                KeyframeAnimation::new(KeyPath::StrokeEnd, vec![0.0, 1.0], 1.0),
                KeyframeAnimation::new(KeyPath::StrokeStart, vec![0.0, 1.0], 1.0)
                    .with_begin_time(1.0),
            ],
            duration: 2.0,
            repeat: Repeat::Forever,
        };
        assert!(close(group.value_at(KeyPath::StrokeEnd, 0.5).unwrap(), 0.5));
        assert_eq!(group.value_at(KeyPath::StrokeStart, 0.5), None);
        assert!(close(group.value_at(KeyPath::StrokeStart, 3.5).unwrap(), 0.5));
        assert_eq!(group.value_at(KeyPath::RotationZ, 0.5), None);
    }
}
