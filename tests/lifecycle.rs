use weekdesk::errors::AppError;
use weekdesk::models::TaskFilter;
use weekdesk::workspace;

#[test]
fn week_of_work_end_to_end() {
    let root = tempfile::tempdir().expect("temp root");
    let root = root.path();

    // Monday: plan the week.
    let review = workspace::task_create(root, 14, "Review release notes", true).expect("create");
    let triage = workspace::task_create(root, 14, "Triage inbox", false).expect("create");
    workspace::subtask_create(root, 14, review.id, "Collect changelog entries").expect("sub");
    let draft = workspace::subtask_create(root, 14, review.id, "Draft summary").expect("sub");

    // Midweek: progress and a correction.
    workspace::subtask_mark_done(root, 14, review.id, draft.id).expect("sub done");
    workspace::task_delete(root, 14, triage.id).expect("drop triage");
    workspace::feedback_create(root, "Planning call ran long").expect("feedback");

    // Friday: the default view hides the deleted task but keeps everything else.
    let mut tasks = workspace::tasks_list(root, 14, &TaskFilter::include_default()).expect("list");
    tasks.sort_by_key(|task| task.id);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, review.id);
    assert_eq!(tasks[0].sub_tasks.len(), 2);
    assert!(tasks[0].is_planned);

    // Done work stays visible by default.
    workspace::task_mark_done(root, 14, review.id).expect("done");
    let tasks = workspace::tasks_list(root, 14, &TaskFilter::include_default()).expect("list");
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].is_done);

    // The deleted task is still on disk and inspectable.
    let dropped = workspace::task_get(root, 14, triage.id).expect("get deleted");
    assert!(dropped.is_deleted);
    assert!(dropped.deleted_at.is_some());

    // Other weeks are untouched scopes.
    assert!(workspace::tasks_list(root, 15, &TaskFilter::include_default())
        .expect("empty week")
        .is_empty());
    assert_eq!(workspace::next_task_id(root, 15).expect("fresh scope"), 1);

    // Feedback lives outside the weekly tree.
    let feedback = workspace::feedback_list(root, &TaskFilter::include_default()).expect("list");
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].description, "Planning call ran long");

    // Lookups never fabricate entries.
    let missing = workspace::task_get(root, 15, 1).expect_err("nothing there");
    assert!(matches!(missing, AppError::NotFound(_)));
    assert_eq!(workspace::next_task_id(root, 15).expect("still fresh"), 1);
}
