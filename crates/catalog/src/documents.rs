//! GraphQL documents sent to the product catalog.

pub const GET_PRODUCTS: &str = r#"
query {
  products(options: { sort: { id: DESC } }) {
    totalItems
    items {
      id
      name
      slug
      description
      facetValues {
        facet { id name code }
        id
        name
        code
      }
      customFields {
        formUrl
        EmpowermentandLeadership
        Industry
        BusinessStage
        ProcessingTime
        RegistrationValidity
        Cost
        Steps
        KeyTermsOfService
        RequiredDocuments
        RelatedServices { id name slug }
      }
    }
  }
}
"#;

pub const GET_FACETS: &str = r#"
query GetFacets {
  facets {
    items {
      id
      name
      code
      values { id name code }
    }
  }
}
"#;

pub const GET_PRODUCT: &str = r#"
query GetProduct($id: ID!) {
  product(id: $id) {
    id
    name
    slug
    description
    facetValues {
      facet { id name code }
      id
      name
      code
    }
    customFields {
      formUrl
      Industry
      BusinessStage
      ProcessingTime
      RegistrationValidity
      Cost
      Steps
      KeyTermsOfService
      RequiredDocuments
      RelatedServices { id name slug }
    }
  }
}
"#;

pub const TOGGLE_FAVORITE: &str = r#"
mutation ToggleFavorite($productId: ID!) {
  toggleFavorite(productId: $productId) {
    items {
      id
      createdAt
      product { id name slug }
    }
    totalItems
  }
}
"#;

pub const GET_COURSE: &str = r#"
query GetCourse($id: ID!) {
  course(id: $id) {
    id
    name
    description
    topicTitle
    skillsGained
    prerequisite
    courseTimeline
    uponCompletion
    partner
    rating
    reviewCount
    startDate
    Cost
    keyHighlights
    duration
    logoUrl
    businessStage
    pricingModel
    serviceCategory
    learningObjectives
    learningOutcomes
    resources
  }
}
"#;

pub const GET_ALL_COURSES: &str = r#"
query GetAllCourses {
  courses(options: { take: 10, skip: 0, sort: { rating: DESC } }) {
    items {
      id
      name
      description
      partner
      rating
      reviewCount
      Cost
      duration
      logoUrl
      businessStage
      pricingModel
      serviceCategory
    }
    totalItems
  }
}
"#;

pub const GET_ALL_EVENTS: &str = r#"
query GetAllEvents {
  products(options: { take: 100 }) {
    totalItems
    items {
      id
      name
      slug
      description
      assets { name }
      facetValues {
        facet { id name code }
        id
        name
        code
      }
      customFields {
        eventRegistrationValidity
        eventType
        eventStartDate
        eventTime
        eventEndDate
        registrationOpenDate
        registrationCloseDate
        virtualEventLink
        eventTags
        eventCategory
        capacity
        eventObjectives
        eventAgenda
        eventFAQ
        eventSpeakers
        eventTickets
        certificateAvailable
        resourceLink
        organiser
        eventLocation
        eventRequirements
      }
    }
  }
}
"#;
