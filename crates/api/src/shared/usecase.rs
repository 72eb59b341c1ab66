use reminder_service_infra::ReminderContext;
use std::fmt::Debug;
use tracing::warn;

#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response: Send;
    type Errors: Send;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Errors>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &ReminderContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        warn!("Use case error: {:?}", e);
    }

    res
}
