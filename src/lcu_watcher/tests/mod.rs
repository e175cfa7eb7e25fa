// Behavioural tests for the watcher, run against a scripted bridge


mod test_watcher;
