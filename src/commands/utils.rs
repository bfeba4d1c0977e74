use crate::models::CommandOption;
use crate::router::Router;
use crate::Error;

/// Add the utility commands to `router`.
pub fn register(router: &mut Router) {
    router
        .interaction("ping", "send ping, get pong")
        .handle(|_inter, _opts| async move { Ok::<_, Error>("pong!") });

    router
        .interaction("userid", "Get the user id of a user")
        .option(CommandOption::user("user", "Member to get the ID of").optional())
        .handle(|inter, opts| async move {
            let member = match opts.member("user") {
                Some(member) => member.clone(),
                None => inter.author().ok_or("interaction has no author")?,
            };
            Ok::<_, Error>(format!("> {} is {}", member.mention(), member.id()))
        });
}
