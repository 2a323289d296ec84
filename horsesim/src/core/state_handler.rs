/// Before this share of the ticks has elapsed, no horse may get further than 10% of the distance
/// ahead of the elapsed share.
const EARLY_FINISH_GUARD: f64 = 0.9;
const EARLY_FINISH_MARGIN: f64 = 0.1;
/// After this share of the ticks has elapsed, horses sprint towards their pre-determined rank.
const FINAL_SPRINT_START: f64 = 0.8;
const FINAL_SPRINT_BONUS: f64 = 0.1;

/// StateHandler tracks the animated progress of one horse along the straight of a round.
///
/// The position is monotonic and never exceeds the round distance. The step size is perturbed
/// every tick so that the motion looks organic, while the final sprint bonus makes the animated
/// order converge to the pre-determined finishing order.
#[derive(Debug, Clone)]
pub struct StateHandler {
    // parameters
    distance: f64,
    final_rank: u32,

    // variables related to the progress along the track
    pos_cur: f64,
    step: f64,
}

impl StateHandler {
    pub fn new(distance: f64, step: f64, final_rank: u32) -> StateHandler {
        StateHandler {
            distance,
            final_rank: final_rank.max(1),
            pos_cur: 0.0,
            step,
        }
    }

    /// update_race_prog advances the horse by one tick. `progress` is the share of elapsed ticks
    /// after the increment, `step_variation` the multiplier applied to the step size afterwards.
    pub fn update_race_prog(&mut self, progress: f64, step_variation: f64) {
        let mut pos_new = self.pos_cur + self.step;
        self.step *= step_variation;

        if progress < EARLY_FINISH_GUARD {
            pos_new = pos_new.min(self.distance * (progress + EARLY_FINISH_MARGIN));
        }

        if progress > FINAL_SPRINT_START {
            pos_new += self.distance * FINAL_SPRINT_BONUS / self.final_rank as f64;
        }

        self.pos_cur = self.pos_cur.max(pos_new.min(self.distance));
    }

    /// snap_to_finish places the horse on the finish line.
    pub fn snap_to_finish(&mut self) {
        self.pos_cur = self.distance;
    }

    pub fn get_position(&self) -> f64 {
        self.pos_cur
    }

    /// get_race_prog returns the covered share of the distance
    pub fn get_race_prog(&self) -> f64 {
        if self.distance > 0.0 {
            self.pos_cur / self.distance
        } else {
            1.0
        }
    }

    pub fn get_finished(&self) -> bool {
        self.pos_cur >= self.distance
    }
}
