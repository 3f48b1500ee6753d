use crate::domain::billing_projector::{Dashboard, SubscriptionSummary as DomainSummary};
use crate::domain::commands::subscriptions::{CreateSubscriptionCommand, CreateSubscriptionResult};
use crate::domain::models::subscription::{
    InvalidRecord, ProjectedSubscription as DomainProjected, Subscription as DomainSubscription, DATE_FORMAT,
};
use shared::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, DashboardResponse,
    ProjectedSubscription as SharedProjected, RejectedRecord, Subscription as SharedSubscription,
    SubscriptionListResponse, SubscriptionSummary as SharedSummary,
};

/// Mapper between shared subscription DTOs and domain models.
pub struct SubscriptionMapper;

impl SubscriptionMapper {
    pub fn to_create_command(request: CreateSubscriptionRequest) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            service_name: request.service_name,
            billing_amount: request.billing_amount,
            currency: request.currency,
            billing_frequency: request.billing_frequency,
            last_billing_date: request.last_billing_date,
        }
    }

    pub fn to_dto(domain: DomainSubscription) -> SharedSubscription {
        SharedSubscription {
            id: domain.id,
            service_name: domain.service_name,
            billing_amount: domain.billing_amount,
            currency: domain.currency,
            billing_frequency: domain.billing_frequency,
            last_billing_date: domain.last_billing_date.format(DATE_FORMAT).to_string(),
            created_at: domain.created_at,
        }
    }

    pub fn to_create_response(result: CreateSubscriptionResult) -> CreateSubscriptionResponse {
        CreateSubscriptionResponse {
            subscription: Self::to_dto(result.subscription),
            success_message: result.success_message,
        }
    }

    pub fn to_list_response(subscriptions: Vec<DomainSubscription>) -> SubscriptionListResponse {
        SubscriptionListResponse {
            subscriptions: subscriptions.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_projected_dto(domain: DomainProjected) -> SharedProjected {
        let due_soon = domain.is_due_soon();
        SharedProjected {
            subscription: Self::to_dto(domain.subscription),
            next_billing_date: domain.next_billing_date.format(DATE_FORMAT).to_string(),
            days_remaining: domain.days_remaining,
            display_date: domain.display_date.format(DATE_FORMAT).to_string(),
            due_soon,
        }
    }

    fn to_summary_dto(domain: DomainSummary) -> SharedSummary {
        SharedSummary {
            count_total: domain.count_total,
            totals_by_currency: domain.totals_by_currency,
        }
    }

    fn to_rejected_dto(domain: InvalidRecord) -> RejectedRecord {
        RejectedRecord {
            id: domain.id,
            reason: domain.reason.to_string(),
        }
    }

    pub fn to_dashboard_response(dashboard: Dashboard) -> DashboardResponse {
        DashboardResponse {
            as_of: dashboard.as_of.format(DATE_FORMAT).to_string(),
            subscriptions: dashboard
                .subscriptions
                .into_iter()
                .map(Self::to_projected_dto)
                .collect(),
            summary: Self::to_summary_dto(dashboard.summary),
            rejected: dashboard.rejected.into_iter().map(Self::to_rejected_dto).collect(),
        }
    }
}
