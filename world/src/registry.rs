//! Arena of live game objects and the win condition.

use std::collections::BTreeMap;

use maze_chase_core::{
    BehaviorMode, Direction, DirectionKeys, EnemyId, ObjectId, PickupId, Point, Rect, RoomId,
    Size,
};

use crate::{timer::PeriodicTimer, RoomCursor};

/// Enemy state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) name: String,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) facing: Direction,
    pub(crate) cursor: RoomCursor,
    pub(crate) timer: PeriodicTimer,
    pub(crate) behavior: BehaviorMode,
}

impl Enemy {
    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }
}

/// Player state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) facing: Direction,
    pub(crate) cursor: RoomCursor,
    pub(crate) timer: PeriodicTimer,
    pub(crate) keys: DirectionKeys,
    pub(crate) health: i32,
    pub(crate) points: u32,
}

impl Player {
    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }
}

/// Pickup state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) name: String,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) room: RoomId,
}

impl Pickup {
    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }
}

/// Canonical storage for every object of the running session.
///
/// Typed collections own the entities while `objects` keeps the generic,
/// insertion-ordered list of everything registered. Each object appears at
/// most once in both.
#[derive(Debug)]
pub(crate) struct Registry {
    objects: Vec<ObjectId>,
    enemies: BTreeMap<EnemyId, Enemy>,
    pickups: BTreeMap<PickupId, Pickup>,
    player: Option<Player>,
    won: bool,
    next_enemy_id: EnemyId,
    next_pickup_id: PickupId,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            objects: Vec::new(),
            enemies: BTreeMap::new(),
            pickups: BTreeMap::new(),
            player: None,
            won: false,
            next_enemy_id: EnemyId::new(0),
            next_pickup_id: PickupId::new(0),
        }
    }

    pub(crate) fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn allocate_pickup_id(&mut self) -> PickupId {
        let id = self.next_pickup_id;
        self.next_pickup_id = PickupId::new(id.get().saturating_add(1));
        id
    }

    fn track(&mut self, object: ObjectId) {
        if !self.objects.contains(&object) {
            self.objects.push(object);
        }
    }

    fn untrack(&mut self, object: ObjectId) {
        self.objects.retain(|candidate| *candidate != object);
    }

    pub(crate) fn add_room(&mut self, room: RoomId) {
        self.track(ObjectId::Room(room));
    }

    /// Stores the enemy unless its identifier is already registered.
    pub(crate) fn add_enemy(&mut self, enemy: Enemy) -> bool {
        if self.enemies.contains_key(&enemy.id) {
            return false;
        }
        self.track(ObjectId::Enemy(enemy.id));
        let _ = self.enemies.insert(enemy.id, enemy);
        true
    }

    /// Stores the pickup unless its identifier is already registered.
    ///
    /// A fresh pickup means there is something left to collect, so the won
    /// flag is cleared.
    pub(crate) fn add_pickup(&mut self, pickup: Pickup) -> bool {
        if self.pickups.contains_key(&pickup.id) {
            return false;
        }
        self.track(ObjectId::Pickup(pickup.id));
        let _ = self.pickups.insert(pickup.id, pickup);
        self.won = false;
        true
    }

    pub(crate) fn set_player(&mut self, player: Player) {
        self.track(ObjectId::Player);
        self.player = Some(player);
    }

    pub(crate) fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let enemy = self.enemies.remove(&id)?;
        self.untrack(ObjectId::Enemy(id));
        Some(enemy)
    }

    pub(crate) fn remove_pickup(&mut self, id: PickupId) -> Option<Pickup> {
        let pickup = self.pickups.remove(&id)?;
        self.untrack(ObjectId::Pickup(id));
        Some(pickup)
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    pub(crate) fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub(crate) fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub(crate) fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.values_mut()
    }

    pub(crate) fn pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.values()
    }

    pub(crate) fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub(crate) fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub(crate) fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub(crate) fn pickup_count(&self) -> usize {
        self.pickups.len()
    }

    pub(crate) fn is_won(&self) -> bool {
        self.won
    }

    /// Marks the game won once no pickups remain, reporting the transition.
    pub(crate) fn settle_win(&mut self) -> bool {
        if self.won || self.pickup_count() > 0 {
            return false;
        }
        self.won = true;
        true
    }

    /// Drops every object and resets the won flag.
    pub(crate) fn clear(&mut self) {
        self.objects.clear();
        self.enemies.clear();
        self.pickups.clear();
        self.player = None;
        self.won = false;
    }
}
