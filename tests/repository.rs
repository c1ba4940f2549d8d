use std::cell::Cell;
use std::rc::Rc;

use tasklist::error::{Error, Result};
use tasklist::kv::{KeyValueStore, MemoryStore};
use tasklist::task::{Priority, TaskId, TaskRepository, TASKS_KEY};
use tasklist::view::{filtered_view, stats, Filter};
use tasklist::FileStore;

/// Memory store that counts writes and can be told to fail them
#[derive(Clone, Default)]
struct ProbeStore {
    inner: MemoryStore,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl KeyValueStore for ProbeStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Storage("quota exceeded".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Storage("quota exceeded".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }
}

struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("access denied".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fn seeded() -> TaskRepository<MemoryStore> {
    let mut repo = TaskRepository::load(MemoryStore::new());
    let a = repo.add("Buy milk", Priority::High).unwrap().id;
    repo.add("Call mom", Priority::Low).unwrap();
    let c = repo.add("File taxes", Priority::Medium).unwrap().id;
    repo.add("Fix bike", Priority::High).unwrap();
    repo.toggle_complete(a).unwrap();
    repo.toggle_complete(c).unwrap();
    repo
}

#[test]
fn add_grows_total_by_one_with_increasing_ids() {
    let mut repo = TaskRepository::load(MemoryStore::new());
    let mut issued: Vec<TaskId> = Vec::new();

    for (i, priority) in Priority::ALL.iter().cycle().take(12).enumerate() {
        let before = stats(repo.list_all()).total;
        let task = repo.add(&format!("task {i}"), *priority).unwrap();
        assert_eq!(stats(repo.list_all()).total, before + 1);
        assert!(issued.iter().all(|&prior| task.id > prior));
        issued.push(task.id);
    }
}

#[test]
fn ids_stay_increasing_across_reloads() {
    let mut repo = seeded();
    let max_before = repo.list_all().iter().map(|t| t.id).max().unwrap();

    let store = repo.store().clone();
    let mut reloaded = TaskRepository::load(store);
    let task = reloaded.add("after reload", Priority::Low).unwrap();
    assert!(task.id > max_before);

    // The original instance is unaffected by the reload.
    assert_eq!(repo.add("original", Priority::Low).unwrap().text, "original");
}

#[test]
fn pending_plus_completed_is_total() {
    let mut repo = seeded();
    for _ in 0..3 {
        let s = stats(repo.list_all());
        assert_eq!(s.pending + s.completed, s.total);
        let first = repo.list_all()[0].id;
        repo.toggle_complete(first).unwrap();
    }
    repo.clear_completed().unwrap();
    let s = stats(repo.list_all());
    assert_eq!(s.pending + s.completed, s.total);
}

#[test]
fn all_filter_matches_list_all() {
    let repo = seeded();
    let viewed: Vec<_> = filtered_view(repo.list_all(), Filter::All).cloned().collect();
    assert_eq!(viewed, repo.list_all());
}

#[test]
fn filters_partition_by_completion() {
    let repo = seeded();
    let pending = filtered_view(repo.list_all(), Filter::Pending).count();
    let completed = filtered_view(repo.list_all(), Filter::Completed).count();
    assert_eq!(pending + completed, repo.len());
    assert!(filtered_view(repo.list_all(), Filter::High).all(|t| t.priority == Priority::High));
}

#[test]
fn set_completed_is_idempotent() {
    let mut once = seeded();
    let id = once.list_all()[1].id;
    once.set_completed(id, true).unwrap();

    let mut twice = TaskRepository::load(once.store().clone());
    twice.set_completed(id, true).unwrap();
    twice.set_completed(id, true).unwrap();

    assert_eq!(once.list_all(), twice.list_all());
    assert_eq!(
        once.store().get(TASKS_KEY).unwrap(),
        twice.store().get(TASKS_KEY).unwrap()
    );
}

#[test]
fn reload_reconstructs_collection() {
    let mut repo = seeded();
    let second = repo.list_all()[1].id;
    repo.delete(second).unwrap();
    repo.add("Late addition", Priority::Medium).unwrap();

    let reloaded = TaskRepository::load(repo.store().clone());
    assert_eq!(reloaded.list_all(), repo.list_all());
}

#[test]
fn reload_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = TaskRepository::load(FileStore::open(dir.path()).unwrap());
    let id = repo.add("Persist me", Priority::High).unwrap().id;
    repo.toggle_complete(id).unwrap();
    repo.add("And me", Priority::Low).unwrap();

    let reloaded = TaskRepository::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(reloaded.list_all(), repo.list_all());
}

#[test]
fn clear_all_then_load_is_empty_and_key_absent() {
    let mut repo = seeded();
    assert_eq!(repo.clear_all().unwrap(), 4);

    let reloaded = TaskRepository::load(repo.into_store());
    assert!(reloaded.list_all().is_empty());
    assert_eq!(reloaded.store().get(TASKS_KEY).unwrap(), None);
    assert!(!reloaded.store().keys().unwrap().contains(&TASKS_KEY.to_string()));
}

#[test]
fn buy_milk_scenario() {
    let mut repo = TaskRepository::load(MemoryStore::new());
    let task = repo.add("Buy milk", Priority::High).unwrap();
    assert_eq!(repo.len(), 1);
    assert!(!task.completed);
    assert_eq!(task.priority, Priority::High);

    let toggled = repo.toggle_complete(task.id).unwrap();
    assert!(toggled.completed);

    let s = stats(repo.list_all());
    assert_eq!((s.total, s.completed, s.pending), (1, 1, 0));

    assert_eq!(repo.clear_completed().unwrap(), 1);
    assert!(repo.is_empty());
}

#[test]
fn empty_text_is_rejected_without_writing() {
    let store = ProbeStore::default();
    let writes = Rc::clone(&store.writes);
    let mut repo = TaskRepository::load(store);

    assert!(matches!(repo.add("", Priority::Low), Err(Error::Validation(_))));
    assert!(matches!(repo.add("   \t ", Priority::Low), Err(Error::Validation(_))));
    assert!(repo.is_empty());
    assert_eq!(writes.get(), 0);
}

#[test]
fn delete_missing_id_leaves_collection() {
    let mut repo = seeded();
    let before = repo.list_all().to_vec();
    assert!(matches!(repo.delete(1), Err(Error::TaskNotFound(1))));
    assert_eq!(repo.list_all(), before.as_slice());
}

#[test]
fn every_mutation_writes_through() {
    let store = ProbeStore::default();
    let writes = Rc::clone(&store.writes);
    let mut repo = TaskRepository::load(store);

    let id = repo.add("one", Priority::Low).unwrap().id;
    assert_eq!(writes.get(), 1);
    repo.toggle_complete(id).unwrap();
    assert_eq!(writes.get(), 2);
    repo.set_completed(id, true).unwrap();
    assert_eq!(writes.get(), 3);
    repo.clear_completed().unwrap();
    assert_eq!(writes.get(), 4);
    repo.clear_completed().unwrap();
    assert_eq!(writes.get(), 4);
}

#[test]
fn failed_write_leaves_memory_matching_storage() {
    let store = ProbeStore::default();
    let fail = Rc::clone(&store.fail_writes);
    let mut repo = TaskRepository::load(store);
    let id = repo.add("stable", Priority::Medium).unwrap().id;
    let before = repo.list_all().to_vec();

    fail.set(true);
    assert!(matches!(repo.add("lost", Priority::High), Err(Error::Storage(_))));
    assert!(matches!(repo.toggle_complete(id), Err(Error::Storage(_))));
    assert!(matches!(repo.delete(id), Err(Error::Storage(_))));
    assert!(matches!(repo.clear_all(), Err(Error::Storage(_))));
    assert_eq!(repo.list_all(), before.as_slice());

    fail.set(false);
    let reloaded = TaskRepository::load(repo.store().clone());
    assert_eq!(reloaded.list_all(), before.as_slice());
}

#[test]
fn failed_set_completed_and_clear_completed_roll_back() {
    let store = ProbeStore::default();
    let fail = Rc::clone(&store.fail_writes);
    let mut repo = TaskRepository::load(store);
    let done = repo.add("done", Priority::High).unwrap().id;
    let open = repo.add("open", Priority::Low).unwrap().id;
    repo.set_completed(done, true).unwrap();
    let before = repo.list_all().to_vec();

    fail.set(true);
    assert!(matches!(repo.set_completed(open, true), Err(Error::Storage(_))));
    assert!(!repo.get(open).unwrap().completed);
    assert!(matches!(repo.clear_completed(), Err(Error::Storage(_))));
    assert!(repo.get(done).is_some());
    assert_eq!(repo.list_all(), before.as_slice());

    fail.set(false);
    let reloaded = TaskRepository::load(repo.store().clone());
    assert_eq!(reloaded.list_all(), before.as_slice());
}

#[test]
fn unreadable_store_loads_empty() {
    let repo = TaskRepository::load(UnreadableStore);
    assert!(repo.is_empty());
    assert!(repo
        .load_warning()
        .unwrap()
        .starts_with("cannot read stored tasks"));
}

#[test]
fn foreign_keys_are_left_alone() {
    let mut store = MemoryStore::new();
    store.set("theme", "dark").unwrap();
    let mut repo = TaskRepository::load(store);
    repo.add("x", Priority::Low).unwrap();
    repo.clear_all().unwrap();

    assert_eq!(repo.store().get("theme").unwrap().as_deref(), Some("dark"));
}
