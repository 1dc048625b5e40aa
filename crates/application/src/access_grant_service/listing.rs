use super::*;

impl AccessGrantService {
    /// Lists the explicit access entries of a Fact, oldest first.
    pub async fn list_fact_access(
        &self,
        actor: &CallerIdentity,
        fact_id: FactId,
    ) -> AppResult<Vec<AclEntry>> {
        let fact = self.fact_lookup.fetch_fact(fact_id).await?;

        self.authorization
            .check_read_permission(actor, &fact)
            .await?;
        self.authorization
            .check_permission(actor, Permission::FactAccessView, fact.organization_id())
            .await?;

        let mut entries = self.acl_store.list_entries(fact.id()).await?;
        entries.sort_by(|left, right| {
            left.timestamp()
                .cmp(&right.timestamp())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(entries)
    }
}
