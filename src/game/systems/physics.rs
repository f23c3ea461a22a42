use crate::game::constants::physics::{BODY_RADIUS, GROUND_Y, MAX_VELOCITY};
use crate::game::pose::{Lifecycle, MotionCommand, Pose, PoseSnapshot};
use crate::game::state::AgentId;
use crate::util::vec2::Vec2;
use crate::util::vec3::Vec3;

/// Whatever owns agent poses: the built-in [`KinematicWorld`] or an adapter
/// around an external rigid-body solver.
///
/// Per tick the runner calls `snapshot`, `take_contacts`, hands the engine's
/// output to `apply_commands`/`apply_lifecycle`, then `integrate`.
pub trait PoseProvider {
    /// Place (or re-place) an agent and enable it
    fn place(&mut self, id: AgentId, pose: Pose);

    /// Poses at tick start
    fn snapshot(&self) -> PoseSnapshot;

    /// Wall contacts since the last call, each reported once per touch
    fn take_contacts(&mut self) -> Vec<AgentId>;

    fn apply_commands(&mut self, commands: &[MotionCommand]);

    fn apply_lifecycle(&mut self, signals: &[Lifecycle]);

    /// Advance poses by `dt` seconds
    fn integrate(&mut self, dt: f32);
}

#[derive(Debug, Clone, Copy)]
struct Body {
    pose: Pose,
    enabled: bool,
    touching_wall: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            enabled: false,
            touching_wall: false,
        }
    }
}

/// Built-in kinematic integrator: ground-locked bodies, speed cap, and an
/// optional circular wall that reports edge-triggered contacts.
#[derive(Debug, Clone, Default)]
pub struct KinematicWorld {
    bodies: Vec<Body>,
    wall_radius: Option<f32>,
    contacts: Vec<AgentId>,
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// World with a solid wall at `radius` that reports contacts
    pub fn with_wall(radius: f32) -> Self {
        Self {
            wall_radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn pose(&self, id: AgentId) -> Option<Pose> {
        self.bodies.get(id as usize).map(|b| b.pose)
    }

    pub fn is_enabled(&self, id: AgentId) -> bool {
        self.bodies.get(id as usize).is_some_and(|b| b.enabled)
    }

    fn body_mut(&mut self, id: AgentId) -> &mut Body {
        let index = id as usize;
        if index >= self.bodies.len() {
            self.bodies.resize(index + 1, Body::default());
        }
        &mut self.bodies[index]
    }
}

impl PoseProvider for KinematicWorld {
    fn place(&mut self, id: AgentId, pose: Pose) {
        let body = self.body_mut(id);
        body.pose = pose;
        body.pose.position.y = GROUND_Y;
        body.pose.velocity.y = 0.0;
        body.enabled = true;
        body.touching_wall = false;
    }

    fn snapshot(&self) -> PoseSnapshot {
        let mut snapshot = PoseSnapshot::with_capacity(self.bodies.len());
        for (index, body) in self.bodies.iter().enumerate() {
            snapshot.set(index as AgentId, body.pose);
        }
        snapshot
    }

    fn take_contacts(&mut self) -> Vec<AgentId> {
        std::mem::take(&mut self.contacts)
    }

    fn apply_commands(&mut self, commands: &[MotionCommand]) {
        for command in commands {
            let Some(body) = self.bodies.get_mut(command.agent() as usize) else {
                continue;
            };
            if !body.enabled {
                continue;
            }
            match *command {
                MotionCommand::SetHorizontalVelocity { velocity, .. } => {
                    body.pose.velocity = body.pose.velocity.with_planar(velocity);
                }
                MotionCommand::Impulse { impulse, .. } => {
                    let planar = body.pose.velocity.planar() + impulse;
                    body.pose.velocity = body.pose.velocity.with_planar(planar);
                }
            }
        }
    }

    fn apply_lifecycle(&mut self, signals: &[Lifecycle]) {
        for signal in signals {
            match *signal {
                Lifecycle::Enable(id) => self.body_mut(id).enabled = true,
                Lifecycle::Disable(id) => {
                    if let Some(body) = self.bodies.get_mut(id as usize) {
                        body.enabled = false;
                        body.pose.velocity = Vec3::ZERO;
                    }
                }
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        let wall = self.wall_radius;
        for (index, body) in self.bodies.iter_mut().enumerate() {
            if !body.enabled {
                continue;
            }

            let velocity = body.pose.velocity.planar().clamp_length(MAX_VELOCITY);
            let mut position = body.pose.position.planar() + velocity * dt;

            if let Some(radius) = wall {
                let limit = (radius - BODY_RADIUS).max(0.0);
                let (outward, distance) = position.normalize_with_length();
                let touching = distance >= limit;
                if touching {
                    position = outward.normalize_or(Vec2::FORWARD) * limit;
                    if !body.touching_wall {
                        self.contacts.push(index as AgentId);
                    }
                }
                body.touching_wall = touching;
            }

            body.pose.velocity = Vec3::from_planar(velocity, 0.0);
            body.pose.position = Vec3::from_planar(position, GROUND_Y);
        }
    }
}
