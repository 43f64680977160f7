use filebatch_runtime::RunCounterStore;
use filebatch_test_support::temp_dir;

#[test]
fn run_ids_increase_across_simulated_restarts() -> anyhow::Result<()> {
    let temp = temp_dir("filebatch-runtime-")?;
    let path = temp.path().join("counter.txt");

    let mut issued = Vec::new();
    for _ in 0..5 {
        // A fresh store per iteration stands in for a new process.
        let store = RunCounterStore::new(&path);
        issued.push(store.next()?);
    }

    assert_eq!(issued, vec![1, 2, 3, 4, 5]);
    Ok(())
}
