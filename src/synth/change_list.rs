/*
Change Lists
============

A change list turns a handful of timestamped value changes into a continuous
per-sample control signal for one block:

    changes:   (t=0, 1.0)            (t=5, 0.0)
    signal:    1 1 1 1 1 0 0 0 0 0 0 0 ...

With a glide time set, changes made with `add_change` ramp linearly instead of
jumping. `add_jump` always jumps, which is what a note starting on an idle
voice wants:

    glide = 4 samples, value 0.0, add_change(1.0, t=2)
    signal:    0 0 .25 .5 .75 1 1 1 ...

The list is preallocated. Pushing past capacity is refused and the caller
decides what to do about it. Changes stamped beyond the end of the current
block are kept and come due in the next one, so a one-sample gate dip on the
last sample of a block is not lost.
*/

#[derive(Debug, Clone, Copy)]
struct Change {
    time: usize,
    value: f32,
    ramp: bool,
}

#[derive(Debug, Clone)]
pub struct ChangeList {
    changes: Vec<Change>,
    capacity: usize,
    value: f32,
    target: f32,
    step: f32,
    remaining: usize,
    glide_samples: usize,
}

impl ChangeList {
    /// Room for `capacity` pending changes. Allocates; setup only.
    pub fn new(capacity: usize) -> Self {
        Self {
            changes: Vec::with_capacity(capacity),
            capacity,
            value: 0.0,
            target: 0.0,
            step: 0.0,
            remaining: 0,
            glide_samples: 0,
        }
    }

    pub fn set_glide_samples(&mut self, samples: usize) {
        self.glide_samples = samples;
    }

    pub fn set_glide_time(&mut self, seconds: f32, sample_rate: f32) {
        self.glide_samples = (seconds.max(0.0) * sample_rate) as usize;
    }

    /// Current output value (the last sample written).
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the list is heading to once every pending change is applied.
    pub fn target(&self) -> f32 {
        self.changes.last().map_or(self.target, |c| c.value)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Change at `time`, gliding if a glide time is set. Returns false when full.
    pub fn add_change(&mut self, value: f32, time: usize) -> bool {
        self.push(Change {
            time,
            value,
            ramp: true,
        })
    }

    /// Change at `time` with no glide. Returns false when full.
    pub fn add_jump(&mut self, value: f32, time: usize) -> bool {
        self.push(Change {
            time,
            value,
            ramp: false,
        })
    }

    fn push(&mut self, change: Change) -> bool {
        if self.changes.len() >= self.capacity {
            return false;
        }
        self.changes.push(change);
        true
    }

    /// Drop pending changes and hold `value` from now on.
    pub fn reset(&mut self, value: f32) {
        self.changes.clear();
        self.value = value;
        self.target = value;
        self.remaining = 0;
    }

    /// Render one block of the signal and consume the changes that fell in it.
    pub fn write_to_signal(&mut self, out: &mut [f32]) {
        let frames = out.len();
        sort_by_time(&mut self.changes);

        let mut next = 0;
        for (n, sample) in out.iter_mut().enumerate() {
            while next < self.changes.len() && self.changes[next].time <= n {
                let change = self.changes[next];
                self.start(change.value, change.ramp);
                next += 1;
            }

            if self.remaining > 0 {
                self.remaining -= 1;
                self.value = if self.remaining == 0 {
                    self.target
                } else {
                    self.value + self.step
                };
            }
            *sample = self.value;
        }

        self.changes.drain(..next);
        for change in &mut self.changes {
            change.time -= frames;
        }
    }

    fn start(&mut self, target: f32, ramp: bool) {
        self.target = target;
        if ramp && self.glide_samples > 0 {
            self.step = (target - self.value) / self.glide_samples as f32;
            self.remaining = self.glide_samples;
        } else {
            self.value = target;
            self.remaining = 0;
        }
    }
}

/// Stable insertion sort; lists are short and usually already in order.
fn sort_by_time(changes: &mut [Change]) {
    for i in 1..changes.len() {
        let mut j = i;
        while j > 0 && changes[j - 1].time > changes[j].time {
            changes.swap(j - 1, j);
            j -= 1;
        }
    }
}
