/// Ok carries the orchestration service's HTTP status code for the deletion
/// request; Err is a transport or SDK failure with no status to inspect.
pub trait StateMachineDeleter {
    fn delete_state_machine(&self, arn: &str) -> Result<u16, String>;
}
